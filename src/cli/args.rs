use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "waqt", version, author, about = "Prayer times, countdown and adhan in your terminal")]
pub struct Cli {
    /// Arm automatic adhan playback as soon as the board opens
    #[arg(long, global = true)]
    pub arm: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Set the city and country used for prayer times
    Setup,
    /// Show today's prayer times and countdown to next prayer
    Times,
    /// Show only the next prayer and its countdown
    Next,
    /// Show or change notification, voice and calculation settings
    Settings {
        #[command(subcommand)]
        action: Option<SettingsCommands>,
    },
    /// Play a muazzin voice to the end (Ctrl-C to stop)
    Preview {
        /// Voice: makkah, madina or mishary
        voice: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommands {
    /// Print the current settings
    Show,
    /// Turn the automatic adhan for one prayer on or off
    Notify {
        /// Prayer name (fajr, dhuhr, asr, maghrib, isha)
        prayer: String,
    },
    /// Pick the muazzin voice for one prayer
    Voice {
        /// Prayer name
        prayer: String,
        /// Voice: makkah, madina or mishary
        voice: String,
    },
    /// Switch the Asr school between Standard and Hanafi
    School,
    /// Cycle the calculation method: MWL, ISNA, Makkah
    Method,
    /// Restore default settings
    Reset,
}
