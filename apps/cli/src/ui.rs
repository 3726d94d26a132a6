use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

pub fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

pub fn banner(subtitle: &str) {
    println!(
        "\n{}  {}\n",
        style("adlabel").cyan().bold(),
        style(subtitle).dim()
    );
}

pub fn ok(msg: impl std::fmt::Display) -> String {
    format!("{} {}", style("✓").green().bold(), msg)
}

pub fn failed(msg: impl std::fmt::Display) -> String {
    format!("{} {}", style("✗").red().bold(), msg)
}

pub fn rule() {
    println!("{}", style("─".repeat(60)).dim());
}
