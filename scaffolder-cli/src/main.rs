use std::fs::File;
use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info, LevelFilter};

use libscaffolder::graph::{AggregationMode, Builder, FilterParams};
use libscaffolder::heuristics::MonteCarloParams;
use libscaffolder::stitch::SequenceStore;
use libscaffolder::{
    anchor_pair_consensus, build_deterministic, build_monte_carlo, construct_groups,
    GroupParams, Metric, PafReader, PathRegistry,
};

mod cli;

fn setup_logging(quiet: u8, verbose: u8) {
    let sum = (verbose as i16) - (quiet as i16);
    let lvl = match sum {
        1 => LevelFilter::Debug,
        2.. => LevelFilter::Trace,
        -1 => LevelFilter::Warn,
        -2 => LevelFilter::Error,
        i if i < -2 => LevelFilter::Off,
        _ => LevelFilter::Info,
    };
    env_logger::Builder::new().filter(None, lvl).init();
}

fn parse_metric(s: &str) -> Metric {
    match s {
        "overlap-score" => Metric::OverlapScore,
        "extension-score" => Metric::ExtensionScore,
        "overlap-score-sqrt" => Metric::OverlapScoreSqrt,
        "extension-score-sqrt" => Metric::ExtensionScoreSqrt,
        // value_parser on the arg already restricts to these four strings.
        _ => unreachable!("unknown metric {s}"),
    }
}

fn filter_mode(args: &cli::Args) -> AggregationMode {
    if args.filter_min {
        AggregationMode::Min
    } else if args.filter_max {
        AggregationMode::Max
    } else if args.filter_sum {
        AggregationMode::Sum
    } else {
        AggregationMode::Avg
    }
}

fn main() -> Result<()> {
    let args = cli::Args::parse();
    setup_logging(args.quiet, args.verbose);
    debug!("{:?}", args);

    let filter_params = FilterParams {
        mode: filter_mode(&args),
        min_overlap_len: args.min_oll,
        min_overlap_frac: args.min_olp,
        max_overhang_len: args.max_ohl,
        max_overhang_frac: args.max_ohp,
    };
    let metric = parse_metric(&args.metric);

    let reads = PafReader::open(&args.reads_paf)
        .with_context(|| format!("reading {}", args.reads_paf.display()))?;
    let contigs = PafReader::open(&args.contigs_paf)
        .with_context(|| format!("reading {}", args.contigs_paf.display()))?;

    let graph = Builder::new(filter_params)
        .ingest(reads, false)?
        .ingest(contigs, true)?
        .build();

    let stats = graph.stats();
    info!(
        "built graph: {} anchors, {} reads",
        stats.num_anchors, stats.num_reads
    );
    debug!("{:?}", stats);

    let mc_params = MonteCarloParams {
        rebuild_attempts: args.rb_att,
        backtrack_attempts: args.bt_att,
        node_num_threshold: args.nn_thr,
    };

    let mut registry = PathRegistry::new();
    registry.extend(build_monte_carlo(&graph, metric, mc_params, args.seed));
    registry.extend(build_deterministic(&graph, metric));
    registry.dedupe();
    info!("discovered {} distinct paths", registry.len());

    let group_params = GroupParams {
        len_threshold: args.len_thr,
        window_size: args.w_size,
        ratio_threshold: args.r_thr,
    };

    let mut sequences = SequenceStore::load(&args.reads_seq)
        .with_context(|| format!("loading {}", args.reads_seq.display()))?;
    sequences.merge(
        SequenceStore::load(&args.contigs_seq)
            .with_context(|| format!("loading {}", args.contigs_seq.display()))?,
    );

    let mut out: Box<dyn Write> = if args.output == "-" {
        Box::new(io::stdout())
    } else {
        Box::new(File::create(&args.output)?)
    };

    for ((start, end), path_refs) in registry.paths_between_anchors() {
        let mut groups = construct_groups(&path_refs, &registry, &group_params);
        for group in &mut groups {
            group.discard_infrequent(&registry);
            group.compute_consensus(&registry);
            group.valid_path_count(&registry);
        }

        let Some(consensus_ref) = anchor_pair_consensus(&groups, &registry) else {
            debug!("no consensus path between anchors {} and {}", start, end);
            continue;
        };
        let path = registry.get(consensus_ref);

        let assembled = libscaffolder::stitch::stitch(&graph, path, &sequences)
            .with_context(|| format!("stitching scaffold {}-{}", start, end))?;

        writeln!(out, ">scaffold_{start}_{end} length={}", path.length())?;
        for chunk in assembled.chunks(70) {
            out.write_all(chunk)?;
            out.write_all(b"\n")?;
        }
    }

    Ok(())
}
