use std::io::Write;

use url::Url;
use url_validator_core::{Phase, StatusBroadcaster, StatusSnapshot};

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "true"
    } else {
        "false"
    }
}

fn url_text(url: &Option<Url>) -> &str {
    url.as_ref().map(Url::as_str).unwrap_or("")
}

/// The three status labels of the form, plus the validated URL once it answered.
pub fn status_summary(view: &StatusSnapshot) -> String {
    let phase = match view.phase {
        Phase::Idle => "idle",
        Phase::Debouncing => "waiting for typing to pause",
        Phase::Probing => "probing",
    };
    let mut text = format!(
        "Network activity: {} | Is valid: {} | Is reachable: {} | {}",
        yes_no(view.network_activity),
        yes_no(view.is_valid_url),
        yes_no(view.is_reachable_url),
        phase
    );
    if view.is_reachable_url {
        text.push_str(&format!("\nValidated URL: {}", url_text(&view.validated_url)));
    }
    text
}

/// Prints one line to stdout per channel change.
pub(crate) fn subscribe_console(status: &StatusBroadcaster) {
    status.subscribe_network_activity(|active| {
        print_line(&format!("Network activity: {}", yes_no(*active)));
    });
    status.subscribe_valid(|valid| print_line(&format!("Is valid: {}", yes_no(*valid))));
    status.subscribe_reachable(|reachable| {
        print_line(&format!("Is reachable: {}", yes_no(*reachable)));
    });
    status.subscribe_validated_url(|url| {
        print_line(&format!("Validated URL: {}", url_text(url)));
    });
}

fn print_line(line: &str) {
    let mut stdout = std::io::stdout().lock();
    let _ = writeln!(stdout, "{line}");
}
