use crate::cli::args::Cli;
use crate::core::compare;
use crate::core::model::SizeTable;
use crate::core::table;
use crate::report;
use anyhow::{Context, Result};
use clap::Parser;
use std::env;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;
use std::process;
use std::time::{Duration, Instant};

pub fn entry() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // Usage errors exit with 1; --help and --version keep clap's behavior.
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            process::exit(1);
        }
        Err(e) => e.exit(),
    };
    run(cli)
}

fn run(args: Cli) -> Result<()> {
    let stats = stats_enabled();
    let t0 = Instant::now();

    let old = load(stats, "read-old", &args.old)?;
    let new = load(stats, "read-new", &args.new)?;

    let t_cmp = Instant::now();
    let cmp = compare::compare(&old, &new)?;
    stage_done(stats, "compare", t_cmp);
    if stats {
        eprintln!(
            "SIZECMP_STATS common={} only_old={} only_new={}",
            cmp.objects.len(),
            cmp.only_in_old.len(),
            cmp.only_in_new.len()
        );
    }

    let t_report = Instant::now();
    match &args.out {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            let mut w = BufWriter::new(file);
            report::text::write(&mut w, &cmp, &old.source, &new.source)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        None => {
            let stdout = io::stdout();
            let mut w = BufWriter::new(stdout.lock());
            report::text::write(&mut w, &cmp, &old.source, &new.source)
                .context("failed to write report to stdout")?;
        }
    }
    stage_done(stats, "report", t_report);

    if stats {
        eprintln!("SIZECMP_STATS total={}", fmt_dur(t0.elapsed()));
    }

    Ok(())
}

fn load(stats: bool, stage: &str, path: &Path) -> Result<SizeTable> {
    let t = Instant::now();
    let (table, info) = table::read_table(path)?;
    stage_done(stats, stage, t);
    if stats {
        eprintln!(
            "SIZECMP_STATS input={} kind={} bytes={} objects={}",
            path.display(),
            info.kind.as_str(),
            info.bytes,
            table.objects.len()
        );
    }
    Ok(table)
}

fn stats_enabled() -> bool {
    matches!(env::var("SIZECMP_STATS").as_deref(), Ok("1"))
}

fn stage_done(stats: bool, name: &str, t: Instant) {
    if stats {
        eprintln!("SIZECMP_STATS stage={} time={}", name, fmt_dur(t.elapsed()));
    }
}

fn fmt_dur(d: Duration) -> String {
    if d.as_secs_f64() < 1.0 {
        format!("{}ms", d.as_millis())
    } else {
        format!("{:.3}s", d.as_secs_f64())
    }
}
