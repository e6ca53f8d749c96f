use clap::{Parser, Subcommand};

/// mealguard: dietary-constraint resolution and servings allocation for institutional menus.
#[derive(Parser, Debug)]
#[command(name = "mealguard")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to the snapshot JSON file (dishes, residents, menus).
    #[arg(short, long, default_value = "mealguard.json", global = true)]
    pub file: String,

    /// Path to an engine config JSON file overriding thresholds.
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Print results as JSON instead of tables.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Partition an institution's residents into serving buckets for a dish.
    Allocate {
        /// Dish id or name.
        #[arg(long)]
        dish: String,

        #[arg(long, default_value = "1")]
        institution: u64,

        /// Evaluation date (YYYY-MM-DD); defaults to today.
        #[arg(long)]
        date: Option<String>,
    },

    /// Check one resident against one dish.
    Classify {
        /// Dish id or name.
        #[arg(long)]
        dish: String,

        #[arg(long)]
        resident: u64,

        #[arg(long)]
        date: Option<String>,
    },

    /// Find or create a texture variant of a dish.
    Variant {
        /// Dish id or name.
        #[arg(long)]
        dish: String,

        /// Target texture: regular, minced or pureed.
        #[arg(long)]
        texture: String,

        /// Save without asking.
        #[arg(short, long)]
        yes: bool,
    },

    /// Texture each resident needs for a dish, creating variants as needed.
    Textures {
        /// Dish id or name.
        #[arg(long)]
        dish: String,

        #[arg(long, default_value = "1")]
        institution: u64,

        #[arg(long)]
        date: Option<String>,

        /// Save without asking.
        #[arg(short, long)]
        yes: bool,
    },

    /// Compute servings for every menu item, filling in those left at zero.
    Plan {
        #[arg(long)]
        menu: u64,

        #[arg(long)]
        date: Option<String>,

        /// Save without asking.
        #[arg(short, long)]
        yes: bool,
    },

    /// Weekly nutrition report for a menu.
    Report {
        #[arg(long)]
        menu: u64,
    },
}
