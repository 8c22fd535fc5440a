use clap::Parser;
use std::ffi::OsStr;
use std::path::PathBuf;

const RB_ATT: &str = "500";
const BT_ATT: &str = "30";
const LEN_THR: &str = "10000";
const NN_THR: &str = "50";
const W_SIZE: &str = "1000";
const R_THR: &str = "0.9";
const SEED: &str = "42";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// PAF file of read-vs-read overlaps
    #[arg(name = "READS_PAF", value_parser = check_path_exists)]
    pub reads_paf: PathBuf,

    /// PAF file of contig-vs-read overlaps
    #[arg(name = "CONTIGS_PAF", value_parser = check_path_exists)]
    pub contigs_paf: PathBuf,

    /// FASTA/FASTQ file of read sequences
    #[arg(name = "READS_SEQ", value_parser = check_path_exists)]
    pub reads_seq: PathBuf,

    /// FASTA/FASTQ file of contig sequences
    #[arg(name = "CONTIGS_SEQ", value_parser = check_path_exists)]
    pub contigs_seq: PathBuf,

    /// Output scaffold FASTA (`-` for stdout)
    #[arg(short, long, value_name = "OUTPUT", default_value = "-")]
    pub output: String,

    /// Edge scoring metric used by both path heuristics
    #[arg(long, value_name = "METRIC", value_parser = ["overlap-score", "extension-score", "overlap-score-sqrt", "extension-score-sqrt"], default_value = "overlap-score")]
    pub metric: String,

    /// Aggregate query/target overlap stats by their average
    #[arg(long = "filter-avg", conflicts_with_all = &["filter_min", "filter_max", "filter_sum"])]
    pub filter_avg: bool,

    /// Aggregate query/target overlap stats by their minimum
    #[arg(long = "filter-min")]
    pub filter_min: bool,

    /// Aggregate query/target overlap stats by their maximum
    #[arg(long = "filter-max")]
    pub filter_max: bool,

    /// Aggregate query/target overlap stats by their sum
    #[arg(long = "filter-sum")]
    pub filter_sum: bool,

    /// Minimum overlap length (bp) to keep an overlap
    #[arg(long = "min-oll", value_name = "INT", default_value = "0")]
    pub min_oll: i64,

    /// Minimum overlap length as a fraction of total sequence length
    #[arg(long = "min-olp", value_name = "FLOAT", default_value = "0.0", value_parser = validate_fraction)]
    pub min_olp: f64,

    /// Maximum overhang length (bp) to keep an overlap
    #[arg(long = "max-ohl", value_name = "INT", default_value_t = i64::MAX)]
    pub max_ohl: i64,

    /// Maximum overhang length as a fraction of overlap length
    #[arg(long = "max-ohp", value_name = "FLOAT", default_value = "1.0", value_parser = validate_fraction)]
    pub max_ohp: f64,

    /// Outer Monte-Carlo rebuild attempts per start anchor
    #[arg(long = "rb-att", value_name = "INT", default_value = RB_ATT)]
    pub rb_att: usize,

    /// Monte-Carlo backtrack attempts per walk
    #[arg(long = "bt-att", value_name = "INT", default_value = BT_ATT)]
    pub bt_att: usize,

    /// Length-histogram grouping threshold (bp) below which all paths collapse into one group
    #[arg(long = "len-thr", value_name = "INT", default_value = LEN_THR)]
    pub len_thr: i64,

    /// Maximum path length in nodes before a walk is aborted
    #[arg(long = "nn-thr", value_name = "INT", default_value = NN_THR)]
    pub nn_thr: usize,

    /// Length-histogram window width (bp)
    #[arg(long = "w-size", value_name = "INT", default_value = W_SIZE)]
    pub w_size: i64,

    /// Valley/peak ratio threshold for the length-histogram split
    #[arg(long = "r-thr", value_name = "FLOAT", default_value = R_THR, value_parser = validate_fraction)]
    pub r_thr: f64,

    /// Random seed for the Monte-Carlo heuristic
    #[arg(short, long, value_name = "INT", default_value = SEED)]
    pub seed: u64,

    /// `-q` only show errors and warnings. `-qq` only show errors. `-qqq` shows nothing.
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "verbose")]
    pub quiet: u8,

    /// `-v` show debug output. `-vv` show trace output.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// A utility function that allows the CLI to error if a path doesn't exist
fn check_path_exists<S: AsRef<OsStr> + ?Sized>(s: &S) -> Result<PathBuf, String> {
    let path = PathBuf::from(s);
    if path.exists() {
        Ok(path)
    } else {
        Err(format!("{} does not exist", path.to_string_lossy()))
    }
}

/// A value parser for percentages/fractions in `[0.0, 1.0]`
fn validate_fraction(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("`{}` is not a valid number", s))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("Value `{}` must be between 0.0 and 1.0", s))
    }
}
