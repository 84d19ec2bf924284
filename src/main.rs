use std::{
    fs,
    path::PathBuf,
};

use anyhow::{
    bail,
    Context,
};
use clap::Parser;
use kanjigrid::{
    anki::{
        self,
        AnkiConnect,
    },
    core::{
        FieldPattern,
        IgnoreList,
    },
    generate,
    persistence,
    CollectionDump,
    GridConfig,
    GroupSet,
    KanjiGridError,
    OrderingMode,
    SortOrder,
};

#[derive(Parser)]
#[command(
    name = "kanjigrid",
    about = "Render a kanji proficiency grid from Anki review history",
    version
)]
struct Cli {
    /// Read cards and notes from a JSON collection dump instead of AnkiConnect
    #[arg(long)]
    input: Option<PathBuf>,

    /// Deck to scan ("*" for all decks)
    #[arg(long)]
    deck: Option<String>,

    /// Note fields to scan, space separated, quote names containing spaces
    #[arg(long)]
    field: Option<String>,

    /// Card interval (days) considered strong
    #[arg(long)]
    interval: Option<u32>,

    /// order-found, unicode, score, frequency or group:<index>
    #[arg(long)]
    order: Option<OrderingMode>,

    /// Show units not yet reviewed
    #[arg(long, overrides_with = "hide_unseen")]
    unseen: bool,

    /// Hide units not yet reviewed
    #[arg(long, overrides_with = "unseen")]
    hide_unseen: bool,

    /// Track every character, not only ideographs
    #[arg(long, overrides_with = "kanji_only")]
    all_chars: bool,

    /// Track ideographs only
    #[arg(long, overrides_with = "all_chars")]
    kanji_only: bool,

    /// Put tooltips on the page
    #[arg(long, overrides_with = "no_tooltips")]
    tooltips: bool,

    /// Leave tooltips out of the page
    #[arg(long, overrides_with = "tooltips")]
    no_tooltips: bool,

    /// Page language tag (ja, zh, zh-Hans, zh-Hant, ko, vi)
    #[arg(long)]
    lang: Option<String>,

    /// Additional group definitions (JSON or HJSON)
    #[arg(long)]
    groups: Vec<PathBuf>,

    /// Extra characters to ignore, read from a text file
    #[arg(long)]
    ignore_file: Vec<PathBuf>,

    /// Write the HTML page here
    #[arg(long)]
    html: Option<PathBuf>,

    /// Write the JSON export here
    #[arg(long)]
    json: Option<PathBuf>,

    /// Write a PNG snapshot of the tile colors here
    #[arg(long)]
    png: Option<PathBuf>,

    #[arg(long, default_value = anki::api::DEFAULT_URL)]
    anki_url: String,

    /// Remember these options for the next run
    #[arg(long)]
    save_settings: bool,

    /// List the available orderings and groups, then exit
    #[arg(long)]
    list_orders: bool,

    /// List the decks AnkiConnect reports, then exit
    #[arg(long)]
    list_decks: bool,
}

/// `Some` when either side of an on/off flag pair was given.
fn switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

impl Cli {
    fn apply(&self, config: &mut GridConfig, groups: &GroupSet) -> Result<(), KanjiGridError> {
        if let Some(deck) = &self.deck {
            config.deck = deck.clone();
        }
        if let Some(field) = &self.field {
            config.fields = FieldPattern::parse_list(field)?;
        }
        if let Some(interval) = self.interval {
            config.strong_interval = interval;
        }
        if let Some(order) = self.order {
            config.ordering = order;
            // Grouped grids default to the group's language
            if let (OrderingMode::Grouped(index), None) = (order, &self.lang) {
                if let Ok(group) = groups.get(index) {
                    config.language = group.language.clone();
                }
            }
        }
        if let Some(lang) = &self.lang {
            config.language = lang.clone();
        }
        if let Some(show_unseen) = switch(self.unseen, self.hide_unseen) {
            config.show_unseen = show_unseen;
        }
        if let Some(kanji_only) = switch(self.kanji_only, self.all_chars) {
            config.kanji_only = kanji_only;
        }
        if let Some(tooltips) = switch(self.tooltips, self.no_tooltips) {
            config.tooltips = tooltips;
        }
        Ok(())
    }
}

fn print_orders(groups: &GroupSet) {
    for order in SortOrder::ALL {
        let token = OrderingMode::Flat(order).to_string();
        println!("{:<12} None, sorted by {}", token, order.pretty_name());
    }
    for (index, group) in groups.iter().enumerate() {
        println!("{:<12} {}", OrderingMode::Grouped(index).to_string(), group.name);
    }
}

async fn load_collection(cli: &Cli, config: &GridConfig) -> anyhow::Result<CollectionDump> {
    if let Some(input) = &cli.input {
        let content = fs::read_to_string(input)
            .with_context(|| format!("Failed to read collection dump {}", input.display()))?;
        let dump: CollectionDump = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse collection dump {}", input.display()))?;
        log::info!("Loaded {} cards from {}", dump.cards.len(), input.display());
        return Ok(dump);
    }

    let anki = AnkiConnect::new(&cli.anki_url);
    if !anki::wait_awake(&anki, 2, 3).await {
        bail!("AnkiConnect is not reachable at {}", anki.url());
    }
    Ok(anki::collect_records(&anki, &config.deck).await?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let mut groups = GroupSet::builtin();
    for path in &cli.groups {
        groups.extend(GroupSet::load(path)?);
    }

    if cli.list_orders {
        print_orders(&groups);
        return Ok(());
    }

    if cli.list_decks {
        let anki = AnkiConnect::new(&cli.anki_url);
        let mut decks = anki.deck_names().await?;
        decks.sort();
        println!("*");
        for deck in decks {
            println!("{}", deck);
        }
        return Ok(());
    }

    let mut config: GridConfig = persistence::load_settings();
    cli.apply(&mut config, &groups)?;
    config.validate(&groups)?;

    let mut ignore = IgnoreList::default();
    for path in &cli.ignore_file {
        ignore = ignore.with_units(IgnoreList::load_units_from_file(path)?);
    }

    let collection = load_collection(&cli, &config).await?;
    let output = generate(&collection.cards, &collection.notes, &config, &ignore, &groups)?;

    if let Some(path) = &cli.html {
        fs::write(path, output.html())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        log::info!("Page saved to {}", path.display());
    }
    if let Some(path) = &cli.json {
        fs::write(path, output.export(&config).to_json()?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        log::info!("JSON saved to {}", path.display());
    }
    if let Some(path) = &cli.png {
        fs::write(path, output.png()?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        log::info!("Image saved to {}", path.display());
    }
    if cli.html.is_none() && cli.json.is_none() && cli.png.is_none() {
        print!("{}", output.html());
    }

    if cli.save_settings {
        persistence::save_json(&config, persistence::SETTINGS_FILE)?;
    }

    Ok(())
}
