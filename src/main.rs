use clap::Parser;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use csvviz::{
    logging, source, AppConfig, Args, ChartBoard, ChartEditor, ChartKind, ConfigManager, Dataset,
    Field, OpenOptions, PaletteSet, Role, APP_NAME,
};
use serde::Serialize;
use tracing::debug;

fn handle_early_exit_flags(args: &Args) -> Result<Option<()>> {
    if args.generate_config {
        let manager = ConfigManager::new(APP_NAME)?;
        let path = manager.write_default_config(args.force)?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(Some(()));
    }
    Ok(None)
}

fn print_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", out);
    Ok(())
}

fn lookup_field<'a>(dataset: &'a Dataset, name: &str) -> Result<&'a Field> {
    dataset.field(name).ok_or_else(|| {
        eyre!(
            "Unknown field '{}'. Available fields: {}",
            name,
            dataset.column_names().join(", ")
        )
    })
}

/// Split a `FIELD=VALUE` filter argument.
fn parse_filter(arg: &str) -> Result<(&str, &str)> {
    match arg.split_once('=') {
        Some((field, value)) if !field.trim().is_empty() => Ok((field.trim(), value)),
        _ => Err(eyre!("Invalid filter '{}'. Expected FIELD=VALUE", arg)),
    }
}

/// Apply the chart-related flags to the editor's draft.
fn configure(
    editor: &mut ChartEditor,
    dataset: &Dataset,
    palettes: &PaletteSet,
    args: &Args,
) -> Result<()> {
    for (role, name) in [(Role::X, &args.x), (Role::Y, &args.y), (Role::Color, &args.color)] {
        if let Some(name) = name {
            editor.bind(role, lookup_field(dataset, name)?.clone());
        }
    }

    for filter in &args.filters {
        let (name, value) = parse_filter(filter)?;
        editor.add_filter(lookup_field(dataset, name)?.clone(), Some(value.to_string()));
    }

    // explicit kind after binding so the suggestion does not replace it
    if let Some(kind) = &args.kind {
        editor.set_kind(kind.parse::<ChartKind>()?);
    }

    if let Some(scheme) = &args.scheme {
        if !palettes.contains(scheme) {
            return Err(eyre!(
                "Unknown color scheme '{}'. Available schemes: {}",
                scheme,
                palettes.names().join(", ")
            ));
        }
        editor.options_mut().color_scheme = scheme.clone();
    }

    if let Some(title) = &args.title {
        editor.set_title(title.clone());
    }

    Ok(())
}

fn run(args: &Args, config: &AppConfig) -> Result<()> {
    let path = args
        .path
        .as_deref()
        .ok_or_else(|| eyre!("A file path is required"))?;
    let opts = OpenOptions::from_args_and_config(args, config);
    let dataset = source::load(path, &opts)?;

    if args.fields {
        return print_json(dataset.fields(), args.pretty);
    }

    let mut board = ChartBoard::from_config(config)?;
    if let Some(max_rows) = args.max_rows {
        if max_rows == 0 {
            return Err(eyre!("--max-rows must be greater than 0"));
        }
        board = board.with_row_limit(max_rows);
    }
    board.load_dataset(dataset);

    let id = board.new_chart()?;
    let mut editor = board.edit(&id)?;
    if let Some(dataset) = board.dataset() {
        configure(&mut editor, dataset, board.palettes(), args)?;
    }
    let series = board.apply(&mut editor)?;
    debug!(labels = series.len(), kind = %editor.committed().kind, "chart ready");

    print_json(&board.render(&id)?, args.pretty)
}

fn main() -> Result<()> {
    let args = Args::parse();
    color_eyre::install()?;

    if let Some(()) = handle_early_exit_flags(&args)? {
        return Ok(());
    }

    let config = AppConfig::load(APP_NAME)?;
    logging::init(args.debug || config.debug.enabled)?;

    run(&args, &config)
}
