use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use tracing::{info, info_span};

use ranktab_cli::config::Settings;
use ranktab_cli::state::{load_state, load_table, save_state};
use ranktab_ingest::{decode_csv, merge_csv, read_csv_pair};
use ranktab_model::{ImportReport, TableModel};
use ranktab_output::{
    Bundle, EncodeScope, EncodedTable, ReadmeContext, bundle_file_name, encode_view_csv,
    encode_with, render_readme, write_bundle,
};

use crate::cli::{ExportArgs, ImportArgs, ShowArgs, UpdateArgs};
use crate::summary::{estimation_notes, print_diagnostics, print_report, view_table};

/// Result of a command that read a table.
#[derive(Debug)]
pub struct CommandOutcome {
    pub report: ImportReport,
    /// File written by the command, if any.
    pub written: Option<PathBuf>,
}

impl CommandOutcome {
    pub fn has_errors(&self) -> bool {
        self.report.has_errors()
    }
}

pub fn run_import(args: &ImportArgs) -> Result<CommandOutcome> {
    let _span = info_span!("import", main = %args.main.display()).entered();
    let pair = read_csv_pair(&args.main, args.notes.as_deref())
        .with_context(|| format!("read {}", args.main.display()))?;
    let decoded = decode_csv(&pair.main, pair.notes())
        .with_context(|| format!("decode {}", args.main.display()))?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| args.main.with_extension("json"));
    save_state(&output, &decoded.model)?;
    print_report(&decoded.report);
    println!("State: {}", output.display());
    Ok(CommandOutcome {
        report: decoded.report,
        written: Some(output),
    })
}

pub fn run_update(args: &UpdateArgs) -> Result<CommandOutcome> {
    let _span = info_span!("update", state = %args.state.display()).entered();
    let mut model = load_state(&args.state)?.model;
    let pair = read_csv_pair(&args.main, args.notes.as_deref())
        .with_context(|| format!("read {}", args.main.display()))?;
    let report = merge_csv(&mut model, &pair.main, pair.notes())
        .with_context(|| format!("merge {}", args.main.display()))?;

    save_state(&args.state, &model)?;
    print_report(&report);
    println!("State: {}", args.state.display());
    Ok(CommandOutcome {
        report,
        written: Some(args.state.clone()),
    })
}

pub fn run_export(args: &ExportArgs, settings: &Settings) -> Result<CommandOutcome> {
    let _span = info_span!("export", input = %args.input.display()).entered();
    let decoded = load_table(&args.input, args.notes.as_deref())?;
    let scope = if args.visible_only {
        EncodeScope::Visible
    } else {
        EncodeScope::All
    };
    let encoded = encode_with(&decoded.model, scope).context("encode table")?;
    let bundle = build_export_bundle(&decoded.model, encoded, scope, settings);

    let prefix = args
        .prefix
        .as_deref()
        .unwrap_or(&settings.export.archive_prefix);
    let path = bundle_path(args, prefix);
    write_bundle_file(&path, &bundle)?;

    print_diagnostics(&decoded.report);
    println!("Bundle: {}", path.display());
    Ok(CommandOutcome {
        report: decoded.report,
        written: Some(path),
    })
}

pub fn run_show(args: &ShowArgs, settings: &Settings) -> Result<CommandOutcome> {
    let _span = info_span!("show", input = %args.input.display()).entered();
    let decoded = load_table(&args.input, args.notes.as_deref())?;
    print_diagnostics(&decoded.report);

    if args.csv {
        let view = encode_view_csv(&decoded.model).context("encode view")?;
        print!("{view}");
    } else {
        let kinds = args.kind.kinds();
        println!("{}", view_table(&decoded.model, kinds));
        for line in estimation_notes(&decoded.model, kinds, settings.display.locale) {
            println!("* {line}");
        }
    }
    Ok(CommandOutcome {
        report: decoded.report,
        written: None,
    })
}

fn build_export_bundle(
    model: &TableModel,
    encoded: EncodedTable,
    scope: EncodeScope,
    settings: &Settings,
) -> Bundle {
    let (entity_count, column_count) = match scope {
        EncodeScope::All => (model.ordered_entities().len(), model.ordered_columns().len()),
        EncodeScope::Visible => (
            model.visible_entities().len(),
            model.all_visible_columns().len(),
        ),
    };
    let readme = render_readme(&ReadmeContext {
        generated_at: Utc::now(),
        main_csv: &encoded.main_csv,
        notes_csv: &encoded.notes_csv,
        entity_count,
        column_count,
    });
    Bundle::new(encoded.main_csv, encoded.notes_csv, readme)
        .with_compression_level(settings.export.compression_level)
}

/// `--output` as given, otherwise the dated default name in `--output-dir`.
pub fn bundle_path(args: &ExportArgs, prefix: &str) -> PathBuf {
    if let Some(output) = &args.output {
        return output.clone();
    }
    let file_name = bundle_file_name(prefix, Local::now().date_naive());
    match &args.output_dir {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}

fn write_bundle_file(path: &Path, bundle: &Bundle) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut writer = write_bundle(BufWriter::new(file), bundle)
        .with_context(|| format!("write bundle {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("flush {}", path.display()))?;
    info!(path = %path.display(), "Export complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    use ranktab_model::Cell;

    use crate::cli::KindArg;

    const MAIN: &str = "\
id,模型名,隐藏,价格,MMLU,显示在列名旁,isModel
101,GPT-4o,否,$5,70/72,,是
102,Claude,是,$3,65?,,是
1,isDataset,否,否,是,,否
2,隐藏,是,否,否,,否
3,显示在模型旁,是,否,否,,否
4,数据集全名,是,价格,MMLU,是,否
5,备注,是,,,是,否
6,id,1,20,57,5,4
";

    const UPDATE: &str = "\
id,模型名,隐藏,GPQA,显示在列名旁,isModel
101,GPT-4o,否,53,,是
103,Gemini,否,59,,是
1,isDataset,否,是,,否
2,隐藏,是,否,,否
3,显示在模型旁,是,否,,否
4,数据集全名,是,GPQA,是,否
5,备注,是,,是,否
6,id,1,58,5,4
";

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn import(dir: &Path) -> PathBuf {
        let main = write(dir, "ranking.csv", MAIN);
        let outcome = run_import(&ImportArgs {
            main,
            notes: None,
            output: None,
        })
        .unwrap();
        assert!(!outcome.has_errors());
        outcome.written.unwrap()
    }

    #[test]
    fn import_writes_state_beside_csv() {
        let dir = tempfile::tempdir().unwrap();
        let state = import(dir.path());
        assert_eq!(state, dir.path().join("ranking.json"));
        let model = load_state(&state).unwrap().model;
        assert_eq!(model.ordered_entities().len(), 2);
        assert_eq!(model.ordered_columns().len(), 2);
    }

    #[test]
    fn update_merges_into_state() {
        let dir = tempfile::tempdir().unwrap();
        let state = import(dir.path());
        let main = write(dir.path(), "update.csv", UPDATE);
        let outcome = run_update(&UpdateArgs {
            state: state.clone(),
            main,
            notes: None,
        })
        .unwrap();
        assert_eq!(outcome.report.counts.entities.created, 1);
        assert_eq!(outcome.report.counts.columns.created, 1);

        let model = load_state(&state).unwrap().model;
        assert_eq!(model.ordered_entities().len(), 3);
        assert_eq!(model.lookup_cell("101", "58").and_then(Cell::value), Some("53"));
        assert_eq!(model.lookup_cell("101", "57").and_then(Cell::value), Some("70/72"));
    }

    #[test]
    fn export_writes_dated_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let state = import(dir.path());
        let out = dir.path().join("out");
        let args = ExportArgs {
            input: state,
            notes: None,
            output: None,
            output_dir: Some(out.clone()),
            visible_only: true,
            prefix: None,
        };
        let outcome = run_export(&args, &Settings::default()).unwrap();
        let path = outcome.written.unwrap();
        assert!(path.starts_with(&out));
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("llm-ranking-") && name.ends_with(".zip"));

        let mut archive = zip_archive(&path);
        let mut main = String::new();
        archive
            .by_name("default-ranking.csv")
            .unwrap()
            .read_to_string(&mut main)
            .unwrap();
        assert!(main.contains("GPT-4o"));
        assert!(!main.contains("Claude"));
    }

    #[test]
    fn export_honours_explicit_output_and_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let main = write(dir.path(), "ranking.csv", MAIN);
        let output = dir.path().join("bundle.zip");
        let args = ExportArgs {
            input: main,
            notes: None,
            output: Some(output.clone()),
            output_dir: None,
            visible_only: false,
            prefix: Some("board".to_string()),
        };
        assert_eq!(bundle_path(&args, "board"), output);
        run_export(&args, &Settings::default()).unwrap();
        assert_eq!(zip_archive(&output).len(), 3);
    }

    #[test]
    fn show_reads_csv_input() {
        let dir = tempfile::tempdir().unwrap();
        let main = write(dir.path(), "ranking.csv", MAIN);
        let outcome = run_show(
            &ShowArgs {
                input: main,
                notes: None,
                kind: KindArg::All,
                csv: true,
            },
            &Settings::default(),
        )
        .unwrap();
        assert!(outcome.written.is_none());
        assert!(!outcome.has_errors());
    }

    #[test]
    fn missing_control_row_fails_import() {
        let dir = tempfile::tempdir().unwrap();
        let broken: String = MAIN
            .lines()
            .filter(|line| !line.starts_with("3,"))
            .map(|line| format!("{line}\n"))
            .collect();
        let main = write(dir.path(), "broken.csv", &broken);
        let error = run_import(&ImportArgs {
            main,
            notes: None,
            output: None,
        })
        .unwrap_err();
        assert!(format!("{error:#}").contains("missing control rows with id 3"));
    }

    fn zip_archive(path: &Path) -> zip::ZipArchive<File> {
        zip::ZipArchive::new(File::open(path).unwrap()).unwrap()
    }
}
