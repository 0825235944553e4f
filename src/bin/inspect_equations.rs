/// Inspect the IDF workbook: counts per sheet, states, or the equation a query resolves to
use clap::Parser;
use std::path::PathBuf;

use idf_equation_service::calculator::intensity_mm_per_hour;
use idf_equation_service::config::Config;
use idf_equation_service::equations::{BestMatchQuery, EquationRepository, SourceSheet};

#[derive(Parser)]
#[command(name = "inspect-equations")]
#[command(about = "Inspect legacy IDF equations loaded from the workbook", long_about = None)]
struct Cli {
    /// Path to IDF_Curves_Brazil.xlsx (defaults to the service lookup)
    #[arg(long, env = "IDF_XLSX_PATH")]
    workbook: Option<PathBuf>,

    /// List states and their municipality counts
    #[arg(long)]
    states: bool,

    /// State to resolve an equation for
    #[arg(long)]
    uf: Option<String>,

    /// Municipality filter for --uf
    #[arg(long)]
    municipio: Option<String>,

    /// Station filter for --uf
    #[arg(long)]
    estacao: Option<String>,

    /// Duration in minutes used to print a sample intensity
    #[arg(long, default_value = "60")]
    duracao: f64,

    /// Return period in years used to print a sample intensity
    #[arg(long, default_value = "10")]
    tr: f64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let path = match cli.workbook {
        Some(path) => path,
        None => Config::from_env().resolve_workbook_path()?,
    };

    println!("Reading equations from: {}", path.display());
    let repository = EquationRepository::from_workbook(&path)?;

    let standard = repository
        .equations()
        .iter()
        .filter(|eq| eq.source_sheet == SourceSheet::Standard)
        .count();
    println!(
        "\nTotal equations: {} (standard={}, disaggregation={})",
        repository.len(),
        standard,
        repository.len() - standard
    );
    println!("References: {}", repository.list_references().len());

    if cli.states {
        println!("\nStates:");
        for state in repository.list_states() {
            println!(
                "  {state}: {} municipalities",
                repository.list_municipalities(&state).len()
            );
        }
    }

    if let Some(uf) = cli.uf {
        let mut query = BestMatchQuery::new(uf.clone());
        query.municipality = cli.municipio;
        query.station = cli.estacao;

        match repository.find_best_match(&query) {
            Some(found) => {
                let eq = found.record;
                println!("\nBest match for {uf}: {} ({:?})", eq.id, found.precision);
                println!("  {} / {} - {} years", eq.state, eq.municipality, eq.years);
                println!("  K={} a={} b={} c={}", eq.k, eq.a, eq.b, eq.c);
                println!("  Reference: {}", eq.reference_code);
                println!(
                    "  i({} min, TR {}) = {:.3} mm/h",
                    cli.duracao,
                    cli.tr,
                    intensity_mm_per_hour(eq.k, eq.a, eq.b, eq.c, cli.duracao, cli.tr)
                );
            }
            None => println!("\nNo equation found for {uf}"),
        }
    }

    Ok(())
}
