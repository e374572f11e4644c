use std::io::{self, Write};

use anyhow::Context;
use clap::Parser;
use tracing::info;

use readycheck::cli::{Cli, Command, HistoryArgs, OutputFormat, RunArgs};
use readycheck::collections::{Plan, solvency};
use readycheck::http::client::Prober;
use readycheck::runner::{Harness, Reporter, RunReport, SilentReporter};
use readycheck::storage::sqlite::RunHistoryStore;
use readycheck::storage::{JsonFileSink, ResultSink};
use readycheck::ui::{self, ConsoleReporter};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let subscriber = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(tracing::Level::WARN.into())
                .from_env_lossy(),
        )
        .finish();
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {err}");
    }

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Run(args) => run(args).await,
        Command::History(args) => show_history(args),
    };

    let code = match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err}");
            let mut causes = err.chain().skip(1).peekable();
            if causes.peek().is_some() {
                eprintln!("\nCaused by:");
                for (index, cause) in causes.enumerate() {
                    eprintln!("    {index}: {cause}");
                }
            }
            1
        }
    };

    let _ = io::stdout().flush();
    std::process::exit(code);
}

async fn run(args: RunArgs) -> anyhow::Result<i32> {
    let prober = Prober::new(&args.base_url, args.timeouts())?;
    let plan = solvency::plan(args.plan_options());
    let mut stdout = io::stdout();

    let report = match args.format {
        OutputFormat::Text => {
            ui::print_banner(&mut stdout, &plan.name, prober.base_url().as_str(), chrono::Utc::now())?;
            let report = if args.quiet {
                execute(prober, &plan, SilentReporter).await
            } else {
                execute(prober, &plan, ConsoleReporter::new(io::stdout())).await
            };
            ui::print_summary(&mut stdout, &report)?;
            report
        }
        OutputFormat::Json => {
            let report = execute(prober, &plan, SilentReporter).await;
            serde_json::to_writer_pretty(&mut stdout, &report)?;
            writeln!(stdout)?;
            report
        }
    };

    let mut sink = JsonFileSink::new(&args.output);
    sink.write(&report)
        .with_context(|| format!("failed to save results to {}", sink.path().display()))?;
    if args.format == OutputFormat::Text {
        writeln!(
            stdout,
            "\n{}",
            ui::style::info(&format!("Detailed results saved to {}", sink.path().display()))
        )?;
    }

    if let Some(path) = &args.history_db {
        let mut store = RunHistoryStore::open(path)
            .with_context(|| format!("failed to open run history {}", path.display()))?;
        store.write(&report).context("failed to record run history")?;
    }

    info!(verdict = %report.summary.verdict, "all done");
    Ok(report.summary.verdict.exit_code())
}

async fn execute<R: Reporter>(prober: Prober, plan: &Plan, reporter: R) -> RunReport {
    Harness::new(prober, reporter).run(plan).await
}

fn show_history(args: HistoryArgs) -> anyhow::Result<i32> {
    let store = RunHistoryStore::open(&args.history_db)
        .with_context(|| format!("failed to open run history {}", args.history_db.display()))?;

    if let Some(run_id) = &args.show {
        let report = store
            .report_json(run_id)?
            .with_context(|| format!("no recorded run with id {run_id}"))?;
        println!("{report}");
        return Ok(0);
    }

    let entries = store.recent(args.limit)?;
    ui::print_history(&mut io::stdout(), &entries)?;
    Ok(0)
}
