use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Datelike;
use clap::{Parser, Subcommand};
use globset::GlobBuilder;
use serde::de::DeserializeOwned;
use walkdir::WalkDir;

use fudosanzei::deduction::resolve_deduction;
use fudosanzei::formatting::{Jpy, Wareki};
use fudosanzei::report::WIDTH;
use fudosanzei::store::ValuationStore;
use fudosanzei::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 評価額を保存するディレクトリ
    #[arg(long, global = true, default_value = ".cache")]
    cache_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// ケースファイルから不動産取得税と登録免許税を計算する
    Calculate {
        /// ケースファイル、またはケースファイルを含むディレクトリ
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// TSV出力
        #[arg(short, long, conflicts_with = "json")]
        tsv: bool,

        /// JSON出力
        #[arg(short, long)]
        json: bool,
    },
    /// 不動産取得税の計算
    Acquisition {
        /// 入力ファイル
        file: PathBuf,

        /// 登録免許税で入力した評価額を取り込む
        #[arg(short, long)]
        import: bool,

        /// JSON出力
        #[arg(short, long)]
        json: bool,
    },
    /// 登録免許税の計算
    Registration {
        /// 入力ファイル
        file: PathBuf,

        /// 不動産取得税で入力した評価額を取り込む
        #[arg(short, long)]
        import: bool,

        /// JSON出力
        #[arg(short, long)]
        json: bool,
    },
    /// 建築年月日から控除額を判定する
    Deduction {
        /// 建築年月日 (YYYY-MM-DD)
        #[arg(short, long)]
        built: Option<Date>,

        /// 取引の種類
        #[arg(short, long, value_enum, default_value = "purchase")]
        transaction: TransactionType,

        /// 住宅用ではない建物
        #[arg(long)]
        non_residential: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    telemetry::init()?;

    let mut w = std::io::stdout().lock();

    match args.command {
        Command::Calculate { paths, tsv, json } => {
            let found_cases = find_all_cases(paths)?;

            let mut evaluations = Vec::with_capacity(found_cases.len());
            for (path, case) in found_cases {
                let context = format!("evaluating `{}` ({})", case.name, path.display());
                let evaluation = calculator::evaluate_case(case).context(context)?;
                evaluations.push(evaluation);
            }
            evaluations.sort_by(|a, b| a.name.cmp(&b.name));

            if json {
                serde_json::to_writer_pretty(&mut w, &evaluations)?;
                writeln!(w)?;
                return Ok(());
            }
            if tsv {
                write!(w, "{}", tsv::TsvTitle)?;
                for evaluation in &evaluations {
                    write!(w, "{}", tsv::TsvEvaluation { evaluation })?;
                }
                return Ok(());
            }

            let mut evaluations = evaluations.iter().peekable();
            while let Some(evaluation) = evaluations.next() {
                write!(w, "{}", report::ReportEvaluation { evaluation })?;

                if evaluations.peek().is_some() {
                    writeln!(w)?;
                    writeln!(w, "{:#<WIDTH$}", "")?;
                    writeln!(w)?;
                }
            }
        }
        Command::Acquisition { file, import, json } => {
            let store = ValuationStore::new(&args.cache_dir).await?;
            let form: format::AcquisitionForm = read_yaml(&file)?;
            let outcome = calculator::acquisition_form(&store, form, import)
                .await
                .with_context(|| format!("evaluating `{}`", file.display()))?;
            if json {
                serde_json::to_writer_pretty(&mut w, &outcome)?;
                writeln!(w)?;
            } else {
                write!(w, "{}", report::ReportAcquisition { outcome: &outcome })?;
            }
        }
        Command::Registration { file, import, json } => {
            let store = ValuationStore::new(&args.cache_dir).await?;
            let form: format::RegistrationForm = read_yaml(&file)?;
            let transaction = form.transaction;
            let result = calculator::registration_form(&store, form, import)
                .await
                .with_context(|| format!("evaluating `{}`", file.display()))?;
            if json {
                serde_json::to_writer_pretty(&mut w, &result)?;
                writeln!(w)?;
            } else {
                let registration = report::ReportRegistration {
                    transaction,
                    result: &result,
                };
                write!(w, "{registration}")?;
            }
        }
        Command::Deduction {
            built,
            transaction,
            non_residential,
        } => {
            let deduction = resolve_deduction(built, transaction, !non_residential);
            writeln!(w, "控除額: {}", Jpy(deduction.deduction))?;
            writeln!(w, "{deduction}")?;
            if let Some(built) = built {
                writeln!(w, "建築年月日: {built} ({})", Wareki(built.year()))?;
            }
        }
    }

    Ok(())
}

fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let rdr =
        fs::File::open(path).with_context(|| format!("opening `{}`", path.display()))?;
    serde_yaml::from_reader(rdr).with_context(|| format!("reading `{}`", path.display()))
}

fn find_all_cases(paths: Vec<PathBuf>) -> Result<HashMap<PathBuf, format::Case>> {
    let mut found_cases = HashMap::new();

    let glob = GlobBuilder::new("**/*.{yml,yaml}")
        .case_insensitive(true)
        .build()?
        .compile_matcher();

    for path in paths {
        for entry in WalkDir::new(path) {
            let entry = entry?;
            let path = entry.path();
            if glob.is_match(path) {
                if found_cases.contains_key(path) {
                    continue;
                }
                let case = read_yaml(path)?;
                found_cases.insert(entry.into_path(), case);
            }
        }
    }

    Ok(found_cases)
}
