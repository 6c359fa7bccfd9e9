use clap::Parser;

// CLI argument structure. The admission policy (10 requests per 60 seconds,
// fixed key table) is deliberately not configurable here.
#[derive(Parser, Debug, Clone)]
#[command(name = "testtrack")]
#[command(about = "Test-management API with API-key admission control")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, default_value_t = 8080)]
    pub port: u16,
}
