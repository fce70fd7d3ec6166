use std::cmp::Reverse;

use shared::models::{Alert, AlertType};

use crate::models::SignalRow;

fn to_alert(alert_type: AlertType, row: &SignalRow) -> Alert {
    Alert { alert_type, signal_date: row.date, price: row.close }
}

/// Reduces a signal history to at most two alerts: the latest open and
/// the latest matching close after it. Without any open, the latest close
/// is returned on its own.
pub fn deduplicate(rows: &[SignalRow]) -> Vec<Alert> {
    // (type, row) for every labeled row that maps to an alert, newest first
    let mut candidates: Vec<(AlertType, &SignalRow)> = rows
        .iter()
        .filter_map(|row| row.signal.and_then(|s| s.alert_type()).map(|t| (t, row)))
        .collect();
    if candidates.is_empty() {
        return Vec::new();
    }
    candidates.sort_by_key(|(_, row)| Reverse(row.date));

    let Some((open_type, open_row)) = candidates.iter().find(|(t, _)| t.is_open()).copied() else {
        // Orphaned close
        return candidates
            .iter()
            .find(|(t, _)| t.is_close())
            .map(|(t, row)| vec![to_alert(*t, row)])
            .unwrap_or_default();
    };

    let mut alerts = vec![to_alert(open_type, open_row)];
    let close_type = open_type.matching_close();
    if let Some((_, close_row)) = candidates.iter().find(|(t, row)| *t == close_type && row.date > open_row.date) {
        alerts.push(to_alert(close_type, close_row));
    }

    alerts.sort_by_key(|a| Reverse(a.signal_date));
    alerts
}

/// At most two alerts; a pair is one open and one close, the close not
/// dated before the open.
pub fn validate_alerts(alerts: &[Alert]) -> bool {
    match alerts {
        [] | [_] => true,
        [a, b] => {
            let (open, close) = match (a.alert_type.is_open(), b.alert_type.is_open()) {
                (true, false) => (a, b),
                (false, true) => (b, a),
                _ => return false,
            };
            close.signal_date >= open.signal_date
        }
        _ => false,
    }
}

pub fn alert_summary(alerts: &[Alert]) -> String {
    match alerts {
        [] => "No alerts".to_string(),
        [_] | [_, _] => alerts
            .iter()
            .map(|a| format!("{} on {}", a.alert_type, a.signal_date))
            .collect::<Vec<_>>()
            .join(", "),
        _ => format!("{} alerts", alerts.len()),
    }
}
