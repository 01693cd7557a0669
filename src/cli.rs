// src/cli.rs

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info};
use unicode_width::UnicodeWidthStr;

use crate::catalog::{
    self, brands, Bounds, Dimension, DualRange, FilterEngine, Motorcycle, Range, ViewContext,
};
use crate::config::{Config, DefaultView};
use crate::errors::ShowroomError;

/// Showroom: browse a motorcycle dealership catalog from the terminal
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional path to the configuration file
    #[clap(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Catalog export (JSON array of motorcycles); overrides [catalog].path
    #[clap(long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Set log level (overrides config, RUST_LOG still wins)
    #[clap(long, value_name = "LEVEL", value_enum)]
    pub log_level: Option<LogLevelCli>,

    /// Scope the view to one brand page, e.g. `ktm` (new bikes only)
    #[clap(long, value_name = "SLUG")]
    pub brand: Option<String>,

    /// Scope the view to used bikes
    #[clap(long)]
    pub used: bool,

    #[clap(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List motorcycles matching the given filters
    List(ListArgs),
    /// List the brands available in the current view
    Brands {
        /// Only brands that have at least one new bike
        #[clap(long)]
        new_only: bool,
    },
    /// Print the year/price/displacement bounds of the catalog
    Bounds,
    /// Show one motorcycle in detail
    Show {
        slug: String,
    },
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Case-insensitive text matched against title, brand and description
    #[clap(long, short)]
    pub search: Option<String>,

    /// Restrict to these brands (repeatable); ignored on a brand page
    #[clap(long = "brand-filter", value_name = "BRAND")]
    pub brand_filter: Vec<String>,

    /// Year range, e.g. 2019..2023
    #[clap(long, value_parser = parse_range_arg)]
    pub year: Option<RangeArg>,

    /// Price range, e.g. 3000..9000
    #[clap(long, value_parser = parse_range_arg)]
    pub price: Option<RangeArg>,

    /// Displacement range in cc, e.g. 125..700
    #[clap(long, value_parser = parse_range_arg)]
    pub cc: Option<RangeArg>,

    /// Only featured motorcycles (the homepage strip)
    #[clap(long)]
    pub featured: bool,

    /// How many featured motorcycles to show [default: 6]
    #[clap(long, value_name = "N", requires = "featured")]
    pub featured_limit: Option<usize>,

    /// Emit JSON instead of a table
    #[clap(long)]
    pub json: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevelCli {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevelCli {
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevelCli::Trace => "trace",
            LogLevelCli::Debug => "debug",
            LogLevelCli::Info => "info",
            LogLevelCli::Warn => "warn",
            LogLevelCli::Error => "error",
        }
    }
}

/// Either side may be omitted and then defaults to the catalog bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct RangeArg {
    pub low: Option<i64>,
    pub high: Option<i64>,
}

pub fn parse_range_arg(s: &str) -> Result<RangeArg, String> {
    parse_range(s).map_err(|e| e.to_string())
}

pub fn parse_range(s: &str) -> Result<RangeArg, ShowroomError> {
    let invalid = || ShowroomError::InvalidRange(s.to_string());
    let (low, high) = s.split_once("..").ok_or_else(invalid)?;
    let side = |part: &str| -> Result<Option<i64>, ShowroomError> {
        let part = part.trim();
        if part.is_empty() {
            Ok(None)
        } else {
            part.parse::<i64>().map(Some).map_err(|_| invalid())
        }
    };
    let arg = RangeArg { low: side(low)?, high: side(high)? };
    if arg.low.is_none() && arg.high.is_none() {
        return Err(invalid());
    }
    Ok(arg)
}

/// Builds the page-level scope from `--brand` / `--used` and the configured default view.
pub fn resolve_view_context(
    brand: Option<&str>,
    used: bool,
    default_view: DefaultView,
) -> Result<ViewContext, ShowroomError> {
    let used = used || (brand.is_none() && default_view == DefaultView::Used);
    match brand {
        Some(slug) => {
            let theme = brands::lookup(slug).ok_or_else(|| ShowroomError::UnknownBrand(slug.to_string()))?;
            info!("Brand page: {} ({})", theme.title, theme.subtitle);
            let mut context = ViewContext::brand_page(theme.title);
            if used {
                context.condition = catalog::Condition::UsedOnly;
            }
            Ok(context)
        }
        None if used => Ok(ViewContext::used_page()),
        None => Ok(ViewContext::catalog()),
    }
}

pub fn handle_command(command: Commands, engine: &mut FilterEngine, config: &Config) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match command {
        Commands::List(args) => handle_list_command(&args, engine, config, &mut out)?,
        Commands::Brands { new_only } => handle_brands_command(new_only, engine, &mut out)?,
        Commands::Bounds => handle_bounds_command(engine.bounds(), &mut out)?,
        Commands::Show { slug } => handle_show_command(&slug, engine, &mut out)?,
    }
    Ok(())
}

// Drives each range through a DualRange so CLI input obeys the same clamping as the TUI sliders.
fn apply_range(engine: &mut FilterEngine, config: &Config, dimension: Dimension, arg: RangeArg) -> Range {
    let span = engine.bounds().get(dimension);
    let mut slider = DualRange::new(span.min, span.max, config.sliders.step(dimension), span.as_range());
    if let Some(high) = arg.high {
        slider.set_high(high);
    }
    if let Some(low) = arg.low {
        slider.set_low(low);
    }
    let range = slider.value();
    engine.set_range(dimension, range);
    range
}

fn handle_list_command(
    args: &ListArgs,
    engine: &mut FilterEngine,
    config: &Config,
    out: &mut impl Write,
) -> Result<()> {
    if let Some(query) = &args.search {
        engine.set_search_query(query.as_str());
    }
    for brand in &args.brand_filter {
        if !engine.is_brand_selected(brand) {
            engine.toggle_brand(brand);
        }
    }
    for (dimension, arg) in [
        (Dimension::Year, args.year),
        (Dimension::Price, args.price),
        (Dimension::Displacement, args.cc),
    ] {
        if let Some(arg) = arg {
            let range = apply_range(engine, config, dimension, arg);
            debug!("{} range resolved to {:?}", dimension.label(), range);
        }
    }

    let mut visible: Vec<&Motorcycle> = engine.compute_visible();
    if args.featured {
        let limit = args.featured_limit.unwrap_or(catalog::FEATURED_LIMIT);
        visible = catalog::featured(visible, limit);
    }

    if args.json {
        serde_json::to_writer_pretty(&mut *out, &visible).map_err(ShowroomError::from)?;
        writeln!(out)?;
        return Ok(());
    }

    if visible.is_empty() {
        writeln!(out, "No motorcycles match the current filters.")?;
        writeln!(out, "Run again without filter flags to reset them.")?;
        return Ok(());
    }
    write_table(&visible, out)?;
    writeln!(out, "{} results", visible.len())?;
    Ok(())
}

fn pad(text: &str, width: usize) -> String {
    let w = text.width();
    if w >= width {
        text.to_string()
    } else {
        format!("{}{}", text, " ".repeat(width - w))
    }
}

fn write_table(rows: &[&Motorcycle], out: &mut impl Write) -> std::io::Result<()> {
    let headers = ["BRAND", "TITLE", "YEAR", "PRICE", "CC", "CONDITION"];
    let cells: Vec<[String; 6]> = rows
        .iter()
        .map(|m| {
            [
                m.brand.clone(),
                m.title.clone(),
                m.year.to_string(),
                catalog::format_price(i64::from(m.price)),
                m.displacement_cc().map_or("-".to_string(), |cc| cc.to_string()),
                m.condition_label(),
            ]
        })
        .collect();

    let mut widths = headers.map(|h| h.width());
    for row in &cells {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.width());
        }
    }

    let header_line: Vec<String> = headers.iter().enumerate().map(|(i, h)| pad(h, widths[i])).collect();
    writeln!(out, "{}", header_line.join("  ").trim_end())?;
    for row in &cells {
        let line: Vec<String> = row.iter().enumerate().map(|(i, c)| pad(c, widths[i])).collect();
        writeln!(out, "{}", line.join("  ").trim_end())?;
    }
    Ok(())
}

fn handle_brands_command(new_only: bool, engine: &FilterEngine, out: &mut impl Write) -> Result<()> {
    let names = if new_only {
        brands::brands_with_new_bikes(engine.items())
    } else {
        engine.available_brands()
    };
    for name in names {
        writeln!(out, "{}", name)?;
    }
    Ok(())
}

fn handle_bounds_command(bounds: &Bounds, out: &mut impl Write) -> Result<()> {
    for dimension in Dimension::ALL {
        let span = bounds.get(dimension);
        writeln!(
            out,
            "{:<13}{} - {}",
            dimension.label(),
            dimension.format_value(span.min),
            dimension.format_value(span.max)
        )?;
    }
    debug!("Bounds: {}", serde_json::to_string(bounds)?);
    Ok(())
}

fn handle_show_command(slug: &str, engine: &FilterEngine, out: &mut impl Write) -> Result<()> {
    let item = catalog::find_by_slug(engine.items(), slug)
        .ok_or_else(|| ShowroomError::UnknownSlug(slug.to_string()))?;
    writeln!(out, "{}", item.brand.to_uppercase())?;
    writeln!(out, "{}", item.title)?;
    if let Some(catchphrase) = &item.catchphrase {
        writeln!(out, "\"{}\"", catchphrase)?;
    }
    writeln!(out)?;
    writeln!(out, "Year:         {}", item.year)?;
    writeln!(out, "Price:        {}", catalog::format_price(i64::from(item.price)))?;
    if let Some(cc) = item.displacement_cc() {
        writeln!(out, "Displacement: {}cc", cc)?;
    }
    writeln!(out, "Condition:    {}", item.condition_label())?;
    for text in [&item.summary, &item.description].into_iter().flatten() {
        writeln!(out)?;
        for line in textwrap::wrap(text, 72) {
            writeln!(out, "{}", line)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_support::{moto, used};
    use clap::CommandFactory;

    fn engine() -> FilterEngine {
        let mut duke = moto("duke", "KTM", 2023, 11990, Some(889));
        duke.title = "890 Duke R".to_string();
        duke.is_featured = Some(true);
        duke.description = Some("Naked sportiva".to_string());
        let items = vec![
            duke,
            moto("svartpilen", "Husqvarna", 2022, 7490, Some(401)),
            used(moto("agility", "KYMCO", 2019, 1800, None), 12500),
        ];
        FilterEngine::new(items, ViewContext::catalog())
    }

    fn run_list(args: ListArgs, engine: &mut FilterEngine) -> String {
        let mut out = Vec::new();
        handle_list_command(&args, engine, &Config::default(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_list_flags() {
        let cli = Cli::try_parse_from([
            "showroom", "--brand", "ktm", "list", "--search", "duke", "--year", "2020..2024",
            "--brand-filter", "KTM", "--brand-filter", "BETA", "--json",
        ])
        .unwrap();
        assert_eq!(cli.brand.as_deref(), Some("ktm"));
        match cli.command {
            Some(Commands::List(args)) => {
                assert_eq!(args.search.as_deref(), Some("duke"));
                assert_eq!(args.year, Some(RangeArg { low: Some(2020), high: Some(2024) }));
                assert_eq!(args.brand_filter, vec!["KTM", "BETA"]);
                assert!(args.json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn range_arg_forms() {
        assert_eq!(parse_range("1..5").unwrap(), RangeArg { low: Some(1), high: Some(5) });
        assert_eq!(parse_range_arg("300..").unwrap(), RangeArg { low: Some(300), high: None });
        assert_eq!(parse_range_arg("..9000").unwrap(), RangeArg { low: None, high: Some(9000) });
        assert!(matches!(parse_range(".."), Err(ShowroomError::InvalidRange(_))));
        assert!(parse_range_arg("2020").is_err());
        assert!(parse_range_arg("a..b").is_err());
    }

    #[test]
    fn view_context_resolution() {
        assert_eq!(resolve_view_context(None, false, DefaultView::Catalog).unwrap(), ViewContext::catalog());
        assert_eq!(resolve_view_context(None, false, DefaultView::Used).unwrap(), ViewContext::used_page());
        assert_eq!(
            resolve_view_context(Some("KTM"), false, DefaultView::Used).unwrap(),
            ViewContext::brand_page("KTM")
        );
        assert_eq!(
            resolve_view_context(Some("ktm"), true, DefaultView::Catalog).unwrap(),
            ViewContext { brand: Some("KTM".to_string()), condition: catalog::Condition::UsedOnly }
        );
        let err = resolve_view_context(Some("harley"), false, DefaultView::Catalog).unwrap_err();
        assert!(matches!(err, ShowroomError::UnknownBrand(_)));
    }

    #[test]
    fn list_prints_table_in_catalog_order() {
        let mut engine = engine();
        let out = run_list(ListArgs::default(), &mut engine);
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("BRAND"));
        assert!(lines[1].contains("890 Duke R"));
        assert!(lines[2].contains("Husqvarna"));
        assert!(lines[3].contains("12.500 km"));
        assert_eq!(lines[4], "3 results");
    }

    #[test]
    fn list_range_flags_are_clamped_like_sliders() {
        let mut engine = engine();
        let args = ListArgs {
            price: Some(RangeArg { low: Some(9000), high: Some(100) }),
            ..ListArgs::default()
        };
        run_list(args, &mut engine);
        let (low, high) = engine.state().price_range;
        assert!(low <= high);
        assert_eq!(low, high);
    }

    #[test]
    fn list_empty_result_offers_reset() {
        let mut engine = engine();
        let args = ListArgs { search: Some("harley".to_string()), ..ListArgs::default() };
        let out = run_list(args, &mut engine);
        assert!(out.contains("No motorcycles match"));
        assert!(out.contains("reset"));
    }

    #[test]
    fn list_featured_json() {
        let mut engine = engine();
        let args = ListArgs { featured: true, json: true, ..ListArgs::default() };
        let out = run_list(args, &mut engine);
        let parsed: Vec<Motorcycle> = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].id, "duke");
    }

    #[test]
    fn list_featured_honours_limit() {
        let items: Vec<Motorcycle> = (0..8)
            .map(|i| {
                let mut m = moto(&format!("f{}", i), "KTM", 2022, 9000, Some(390));
                m.is_featured = Some(true);
                m
            })
            .collect();
        let mut engine = FilterEngine::new(items.clone(), ViewContext::catalog());
        let out = run_list(ListArgs { featured: true, json: true, ..ListArgs::default() }, &mut engine);
        let parsed: Vec<Motorcycle> = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed.len(), catalog::FEATURED_LIMIT);
        assert_eq!(parsed[0].id, "f0");

        let mut engine = FilterEngine::new(items, ViewContext::catalog());
        let args = ListArgs { featured: true, featured_limit: Some(2), json: true, ..ListArgs::default() };
        let parsed: Vec<Motorcycle> = serde_json::from_str(&run_list(args, &mut engine)).unwrap();
        assert_eq!(parsed.len(), 2);
    }

    #[test]
    fn brands_and_show() {
        let engine = engine();
        let mut out = Vec::new();
        handle_brands_command(true, &engine, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "KTM\nHusqvarna\n");

        let mut out = Vec::new();
        handle_show_command("duke", &engine, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("KTM\n890 Duke R\n"));
        assert!(text.contains("€ 11.990"));
        assert!(text.contains("889cc"));

        let mut out = Vec::new();
        assert!(handle_show_command("nope", &engine, &mut out).is_err());
    }
}
