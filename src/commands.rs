use indexmap::IndexMap;
use log::{debug, info, warn};
use std::path::Path;

use crate::{
    io::{OutputFile, Segmentation},
    manifest::{read_manifest, Sample},
    metrics::{coverage, cosine_similarity, euclidean_similarity, jaccard},
    overlaps::OverlapEngine,
    prelude::*,
    reporting::{CommandOutput, Report},
    vectorize::OccupancyVector,
};

/// The four similarity scores.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Metric {
    Jaccard,
    Coverage,
    Euclidean,
    Cosine,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Jaccard,
        Metric::Coverage,
        Metric::Euclidean,
        Metric::Cosine,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Metric::Jaccard => "jaccard",
            Metric::Coverage => "coverage",
            Metric::Euclidean => "euclidean",
            Metric::Cosine => "cosine",
        }
    }

    /// The name of the results table for this metric.
    pub fn results_filename(&self) -> String {
        format!("{}_results.txt", self.name())
    }
}

/// The four scores of one replicate against its original.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReplicateScores {
    pub jaccard: f64,
    pub coverage: f64,
    pub euclidean: f64,
    pub cosine: f64,
}

impl ReplicateScores {
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Jaccard => self.jaccard,
            Metric::Coverage => self.coverage,
            Metric::Euclidean => self.euclidean,
            Metric::Cosine => self.cosine,
        }
    }
}

/// Per-metric scores of each sample's replicates, in replicate order.
/// Samples are kept in the order they were added.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScoreAccumulators {
    scores: IndexMap<Metric, IndexMap<String, Vec<f64>>>,
}

impl ScoreAccumulators {
    /// Create accumulators with an empty entry for each sample.
    pub fn new<'a>(sample_names: impl IntoIterator<Item = &'a str>) -> Self {
        let names: Vec<&str> = sample_names.into_iter().collect();
        let scores = Metric::ALL
            .iter()
            .map(|&metric| {
                let per_sample = names
                    .iter()
                    .map(|name| (name.to_string(), Vec::new()))
                    .collect();
                (metric, per_sample)
            })
            .collect();
        Self { scores }
    }

    /// Append a replicate's scores to a sample's entries. The sample must
    /// have been given to [`ScoreAccumulators::new()`].
    pub fn push(&mut self, sample_name: &str, scores: &ReplicateScores) -> Result<(), BedSimError> {
        for (metric, per_sample) in self.scores.iter_mut() {
            per_sample
                .get_mut(sample_name)
                .ok_or_else(|| BedSimError::UnknownSample(sample_name.to_string()))?
                .push(scores.get(*metric));
        }
        Ok(())
    }

    /// The scores of all samples for one metric.
    pub fn get(&self, metric: Metric) -> Option<&IndexMap<String, Vec<f64>>> {
        self.scores.get(&metric)
    }

    /// The scores of one sample for one metric.
    pub fn sample_scores(&self, metric: Metric, sample_name: &str) -> Option<&[f64]> {
        self.get(metric)
            .and_then(|per_sample| per_sample.get(sample_name))
            .map(|scores| scores.as_slice())
    }

    /// Write one results table per metric into `output_dir`.
    pub fn write_tables(&self, output_dir: impl AsRef<Path>) -> Result<(), BedSimError> {
        let output_dir = output_dir.as_ref();
        std::fs::create_dir_all(output_dir)?;
        for (metric, per_sample) in &self.scores {
            let output = OutputFile::new(output_dir.join(metric.results_filename()));
            write_score_table(&output, per_sample)?;
            info!("wrote {}", output.path().display());
        }
        Ok(())
    }
}

/// Write a comma-separated table with one column per sample and one row per
/// replicate index. Samples with fewer replicates have empty cells.
pub fn write_score_table(
    output: &OutputFile,
    per_sample: &IndexMap<String, Vec<f64>>,
) -> Result<(), BedSimError> {
    let mut writer = csv::Writer::from_writer(output.writer()?);
    writer.write_record(per_sample.keys())?;

    let num_rows = per_sample.values().map(Vec::len).max().unwrap_or(0);
    for i in 0..num_rows {
        let row = per_sample.values().map(|scores| {
            scores
                .get(i)
                .map_or_else(String::new, |score| format!("{:?}", score))
        });
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Score one replicate against its sample's original file.
pub fn score_replicate(
    engine: &OverlapEngine,
    sample: &Sample,
    segmentation: &Segmentation,
    original_vector: &OccupancyVector,
    replicate: &Path,
) -> Result<ReplicateScores, BedSimError> {
    let jaccard = jaccard(engine, &sample.original_file, replicate)?;
    debug!("Jaccard:\t{}", jaccard);

    let coverage = coverage(&sample.original_file, replicate)?;
    debug!("Coverage:\t{}", coverage);

    let replicate_vector = vectorize(engine, replicate, segmentation)?;
    let euclidean = euclidean_similarity(original_vector, &replicate_vector, segmentation.len())?;
    debug!("Euclidean:\t{}", euclidean);

    let cosine = cosine_similarity(original_vector, &replicate_vector)?;
    debug!("Cosine:\t\t{}", cosine);

    Ok(ReplicateScores {
        jaccard,
        coverage,
        euclidean,
        cosine,
    })
}

/// Score every replicate of every sample in the project manifest against the
/// sample's original file, and write the four results tables into `output_dir`.
///
/// Replicates of sample `s` are the files `<input_dir>/<s>/<s>_rep*.bed`. A sample
/// with no replicates is reported and keeps an empty column in each table.
pub fn bedsim_score(
    engine: &OverlapEngine,
    input_dir: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    manifest: impl AsRef<Path>,
) -> Result<CommandOutput<ScoreAccumulators>, BedSimError> {
    let input_dir = input_dir.as_ref();
    let samples = read_manifest(manifest)?;

    // for reporting stuff to the user
    let mut report = Report::new();

    let mut accumulators = ScoreAccumulators::new(samples.iter().map(|s| s.name.as_str()));

    for sample in &samples {
        info!("Processing sample {}", sample.name);
        let segmentation = Segmentation::from_path(&sample.segmentation_file)?;
        // reused for every replicate of this sample
        let original_vector = vectorize(engine, &sample.original_file, &segmentation)?;

        let replicates = sample.replicate_files(input_dir)?;
        if replicates.is_empty() {
            let message = format!(
                "no replicate files found for sample '{}' ({})",
                sample.name,
                sample.replicate_pattern(input_dir)
            );
            warn!("{}", message);
            report.add_issue(message);
            continue;
        }

        for replicate in &replicates {
            debug!("Processing {}", replicate.display());
            let scores =
                score_replicate(engine, sample, &segmentation, &original_vector, replicate)?;
            accumulators.push(&sample.name, &scores)?;
        }
    }

    for metric in Metric::ALL {
        if let Some(per_sample) = accumulators.get(metric) {
            let counts: Vec<String> = per_sample
                .iter()
                .map(|(name, scores)| format!("{}: {}", name, scores.len()))
                .collect();
            debug!("{} scores calculated: {}", metric.name(), counts.join(", "));
        }
    }

    accumulators.write_tables(output_dir)?;
    Ok(CommandOutput::new(accumulators, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utilities::fake_engine;
    use std::fs;

    fn scores(value: f64) -> ReplicateScores {
        ReplicateScores {
            jaccard: value,
            coverage: value,
            euclidean: value,
            cosine: value,
        }
    }

    #[test]
    fn test_accumulators_keep_sample_order_and_empty_entries() {
        let mut acc = ScoreAccumulators::new(["b", "a", "c"]);
        acc.push("a", &scores(0.5)).unwrap();
        acc.push("b", &scores(1.0)).unwrap();
        acc.push("a", &scores(0.25)).unwrap();

        let jaccard = acc.get(Metric::Jaccard).unwrap();
        let names: Vec<&String> = jaccard.keys().collect();
        assert_eq!(names, vec!["b", "a", "c"]);
        assert_eq!(acc.sample_scores(Metric::Cosine, "a").unwrap(), &[0.5, 0.25]);
        assert!(acc.sample_scores(Metric::Coverage, "c").unwrap().is_empty());
    }

    #[test]
    fn test_accumulators_reject_unknown_sample() {
        let mut acc = ScoreAccumulators::new(["a"]);
        assert!(matches!(
            acc.push("z", &scores(1.0)),
            Err(BedSimError::UnknownSample(name)) if name == "z"
        ));
        let jaccard = acc.get(Metric::Jaccard).unwrap();
        assert_eq!(jaccard.len(), 1);
        assert!(jaccard["a"].is_empty());
    }

    #[test]
    fn test_write_score_table_with_ragged_columns() {
        let dir = tempfile::tempdir().unwrap();
        let mut per_sample = IndexMap::new();
        per_sample.insert("s1".to_string(), vec![1.0, 0.5]);
        per_sample.insert("s2".to_string(), vec![0.25]);
        per_sample.insert("s3".to_string(), vec![]);

        let output = OutputFile::new(dir.path().join("table.txt"));
        write_score_table(&output, &per_sample).unwrap();
        let contents = fs::read_to_string(output.path()).unwrap();
        assert_eq!(contents, "s1,s2,s3\n1.0,0.25,\n0.5,,\n");
    }

    #[test]
    fn test_write_score_table_all_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut per_sample = IndexMap::new();
        per_sample.insert("s1".to_string(), vec![]);

        let output = OutputFile::new(dir.path().join("table.txt"));
        write_score_table(&output, &per_sample).unwrap();
        assert_eq!(fs::read_to_string(output.path()).unwrap(), "s1\n");
    }

    /// Lay out a project with one sample `name` and the given replicate contents.
    fn setup_sample(root: &Path, name: &str, original: &str, replicates: &[&str]) {
        fs::create_dir_all(root.join("data")).unwrap();
        fs::write(root.join("data").join(format!("{}.bed", name)), original).unwrap();
        let sample_dir = root.join("input").join(name);
        fs::create_dir_all(&sample_dir).unwrap();
        for (i, contents) in replicates.iter().enumerate() {
            fs::write(sample_dir.join(format!("{}_rep{}.bed", name, i + 1)), contents).unwrap();
        }
    }

    #[test]
    fn test_bedsim_score_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let engine = fake_engine(root);

        fs::write(
            root.join("universe.bed"),
            "chrom\tstart\tend\nchr1\t0\t10\nchr1\t10\t20\nchr1\t20\t30\nchr1\t30\t40\n",
        )
        .unwrap();
        // original occupies segments 0 and 2
        setup_sample(
            root,
            "s1",
            "chr1\t0\t10\nchr1\t20\t30\n",
            &[
                // identical
                "chr1\t0\t10\nchr1\t20\t30\n",
                // occupies segments 1 and 3: disjoint
                "chr1\t10\t20\nchr1\t30\t40\n",
            ],
        );
        setup_sample(root, "s2", "chr1\t0\t10\n", &[]);
        fs::write(
            root.join("project.csv"),
            "sample_name,base_path,file,universe\n\
             s1,data,s1.bed,universe.bed\n\
             s2,data,s2.bed,universe.bed\n",
        )
        .unwrap();

        let output_dir = root.join("output");
        let output = bedsim_score(
            &engine,
            root.join("input"),
            &output_dir,
            root.join("project.csv"),
        )
        .unwrap();

        let acc = output.value();
        assert_eq!(acc.sample_scores(Metric::Jaccard, "s1").unwrap(), &[1.0, 0.0]);
        assert_eq!(acc.sample_scores(Metric::Coverage, "s1").unwrap(), &[1.0, 0.0]);
        assert_eq!(acc.sample_scores(Metric::Euclidean, "s1").unwrap(), &[1.0, 0.0]);
        assert_eq!(acc.sample_scores(Metric::Cosine, "s1").unwrap(), &[1.0, 0.0]);
        assert!(acc.sample_scores(Metric::Jaccard, "s2").unwrap().is_empty());
        assert_eq!(output.report().issues().len(), 1);

        for metric in Metric::ALL {
            let contents =
                fs::read_to_string(output_dir.join(metric.results_filename())).unwrap();
            assert_eq!(contents, "s1,s2\n1.0,\n0.0,\n");
        }
    }

    #[test]
    fn test_bedsim_score_missing_segmentation_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let engine = fake_engine(root);
        fs::write(root.join("s1.bed"), "chr1\t0\t10\n").unwrap();
        fs::write(
            root.join("project.csv"),
            "sample_name,file,universe\ns1,s1.bed,missing.bed\n",
        )
        .unwrap();

        let result = bedsim_score(&engine, root, root.join("output"), root.join("project.csv"));
        assert!(result.is_err());
    }
}
