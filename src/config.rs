use clap::Parser;
use std::path::PathBuf;

// Like values the synthesizer picks from
pub const LIKE_VALUES: &[u32] = &[111, 134, 183, 199, 121, 200];

// CLI argument structure
#[derive(Parser, Debug, Clone)]
#[command(name = "like-api")]
#[command(about = "Like-sending API with a per-UID daily limit")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, default_value_t = 8000)]
    pub port: u16,

    // Upstream profile lookup URL, {} is replaced with the uid
    #[arg(short, long, default_value = "https://dhrubo-info-api.vercel.app/get?uid={}")]
    pub upstream_url: String,

    // Upstream request timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub upstream_timeout: u64,

    // Minimum seconds between two grants for the same uid
    #[arg(long, default_value_t = 86400)]
    pub limit_window: u64,

    // JSON file holding uid -> last grant timestamps
    // When unset, limits live in memory and reset on restart
    #[arg(long)]
    pub grants_file: Option<PathBuf>,

    // Source tag echoed in every response
    #[arg(long, default_value = "like-api")]
    pub source: String,

    // Telegram contact echoed in success responses
    #[arg(long, default_value = "@like_api")]
    pub telegram_id: String,
}
