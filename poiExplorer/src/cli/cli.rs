use clap::{ArgGroup, Parser};

#[derive(Parser, Debug)]
#[command(author, version, about = "Find nearby places around a named place or your own position", long_about = None)]
#[command(group(ArgGroup::new("anchor").required(true).args(["place", "locate"])))]
pub struct Args {
    #[arg(short, long, help = "Recorded service responses to answer queries from", default_value = "poiExplorer/assets/delhi_world.json")]
    world: String,

    #[arg(short, long, help = "Explorer config JSON; defaults are used when omitted")]
    config: Option<String>,

    #[arg(short, long, help = "Place name to search around")]
    place: Option<String>,

    #[arg(short, long, help = "Search around the device position instead of a place", default_value_t = false)]
    locate: bool,

    #[arg(short = 'k', long, help = "POI category to search for (e.g. restaurant, cafe, hospital)")]
    category: Option<String>,

    #[arg(long, help = "Re-run the search with another category after the first one")]
    switch_category: Option<String>,

    #[arg(short, long, help = "Select a result by its position in the list (0-based)")]
    select: Option<usize>,

    #[arg(long, help = "Write results and route to CSV under this directory")]
    csv_dir: Option<String>,

    #[arg(long, help = "Print the final snapshot as JSON", default_value_t = false)]
    json: bool,

    #[arg(long, default_value_t = false)]
    enable_timing: bool,

    #[arg(long, default_value_t = false)]
    debug_logging: bool,
}

// Add getter methods for all fields
impl Args {
    pub fn world(&self) -> &str {
        &self.world
    }

    pub fn config(&self) -> Option<&str> {
        self.config.as_deref()
    }

    pub fn place(&self) -> Option<&str> {
        self.place.as_deref()
    }

    pub fn locate(&self) -> bool {
        self.locate
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn switch_category(&self) -> Option<&str> {
        self.switch_category.as_deref()
    }

    pub fn select(&self) -> Option<usize> {
        self.select
    }

    pub fn csv_dir(&self) -> Option<&str> {
        self.csv_dir.as_deref()
    }

    pub fn json(&self) -> bool {
        self.json
    }

    pub fn enable_timing(&self) -> bool {
        self.enable_timing
    }

    pub fn debug_logging(&self) -> bool {
        self.debug_logging
    }
}
