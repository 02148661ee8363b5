use anyhow::{bail, Context, Result};
use chrono::Local;
use std::env;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::fmt::time::ChronoLocal;

use tbb_reply::{
    build_report, collect_letters, report_file_name, save_replies, save_reply_text,
    write_report_csv, AppConfig, BatchCoordinator, BatchSummary, CaseResolver, CustomerRegistry,
    FieldExtractor, FileDecoder, Letter, LetterFormat, ResponseComposer, TextDecoder,
};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    let args: Vec<String> = env::args().collect();
    let config = AppConfig::from_env();

    match (args.get(1).map(String::as_str), args.get(2)) {
        (Some("letter"), Some(file)) => run_letter(&config, Path::new(file)),
        (Some("batch"), Some(folder)) => run_batch(&config, Path::new(folder)),
        _ => {
            eprintln!("Usage:");
            eprintln!("   tbb-reply letter <file>     Analyse one letter and save its reply");
            eprintln!("   tbb-reply batch <folder>    Analyse every letter in a folder");
            eprintln!();
            eprintln!("Letters are read from .txt files; .docx and .pdf need converting to text first.");
            std::process::exit(2);
        }
    }
}

fn load_registry(config: &AppConfig) -> Result<Option<CustomerRegistry>> {
    if let Some(path) = &config.registry.path {
        let registry = CustomerRegistry::from_csv_path(path)
            .with_context(|| format!("Failed to load customer list: {}", path.display()))?;
        return Ok(Some(registry));
    }

    let dir = env::current_dir().context("Failed to resolve current directory")?;
    let registry = CustomerRegistry::discover(&dir, &config.registry.candidates)
        .context("Failed to load customer list")?;
    if registry.is_none() {
        warn!("no customer list loaded, customer status will be unknown");
    }
    Ok(registry)
}

fn output_dir(config: &AppConfig) -> Result<PathBuf> {
    let dir = config.output.dir.clone();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create output folder: {}", dir.display()))?;
    Ok(dir)
}

fn run_letter(config: &AppConfig, file: &Path) -> Result<()> {
    let registry = load_registry(config)?;
    let text = FileDecoder::new()
        .decode(file)
        .with_context(|| format!("Failed to read letter: {}", file.display()))?;

    let name = file
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown");
    let fields = FieldExtractor::new().extract(&text);
    let case = CaseResolver::new(registry.as_ref()).resolve(name, fields);

    let document = ResponseComposer::new(config.letterhead.clone()).compose(&case);
    println!("{}", document.to_plain_text());

    let today = Local::now().date_naive();
    match save_reply_text(&output_dir(config)?, &case, &document, today) {
        Ok(path) => info!(path = %path.display(), "reply saved"),
        Err(e) => bail!("Reply not saved: {}", e),
    }

    Ok(())
}

fn run_batch(config: &AppConfig, folder: &Path) -> Result<()> {
    let registry = load_registry(config)?;
    let decoder = FileDecoder::new();

    let paths = collect_letters(folder)?;
    if paths.is_empty() {
        bail!("No letter files (.docx, .pdf, .txt) in {}", folder.display());
    }
    info!(count = paths.len(), folder = %folder.display(), "letters found");

    let undecodable = paths
        .iter()
        .filter(|p| LetterFormat::detect(p).map_or(true, |f| !f.is_decodable()))
        .count();
    if undecodable > 0 {
        warn!(
            count = undecodable,
            "only .txt letters are read; .docx and .pdf letters are reported as failed"
        );
    }

    let letters = paths.iter().map(|p| Letter::from_path(p, &decoder));
    let coordinator = BatchCoordinator::new(
        FieldExtractor::new(),
        ResponseComposer::new(config.letterhead.clone()),
    );
    let records = coordinator.run(letters, registry.as_ref());

    let summary = BatchSummary::from_records(&records);
    println!("{}", summary.summary());

    let out = output_dir(config)?;
    let now = Local::now();
    let report_path = out.join(report_file_name(now.naive_local()));
    write_report_csv(&report_path, &build_report(&records))
        .with_context(|| format!("Failed to write report: {}", report_path.display()))?;

    let replies = coordinator.compose_replies(&records);
    let saved = save_replies(&out, &replies, now.date_naive());
    println!(
        "{} yanıt yazısı kaydedildi (yalnızca müşteri olmayanlar için). Rapor: {}",
        saved,
        report_path.display()
    );

    Ok(())
}
