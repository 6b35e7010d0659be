use clap::Parser;

use symptom_chat_lib::cli::CliOptions;

#[tokio::main]
async fn main() {
    let options = CliOptions::parse();

    if let Err(e) = symptom_chat_lib::run(options).await {
        eprintln!("symptom-chat: {}", e);
        std::process::exit(1);
    }
}
