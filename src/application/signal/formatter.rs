use crate::domain::signal::{Signal, SignalAction};
use std::fmt::Write;

/// Number of ranked sectors listed at the bottom of a signal message.
const TOP_SECTORS: usize = 5;

/// Renders a signal as a multi-line notification message.
pub fn format_signal_message(signal: &Signal) -> String {
    let mut out = String::from("=== Trading signal generated ===\n");
    let _ = writeln!(out, "⏰ {}", signal.timestamp.format("%Y-%m-%d %H:%M:%S %Z"));
    let _ = writeln!(
        out,
        "📊 Action: {} | Confidence: {}\n",
        signal.action, signal.confidence
    );

    if signal.action == SignalAction::Hold {
        let _ = writeln!(
            out,
            "💤 {}",
            signal.reason.as_deref().unwrap_or("No trading signal")
        );
        write_top_scores(&mut out, signal);
        return out;
    }

    if !signal.warnings.is_empty() {
        out.push_str("⚠️ Warnings:\n");
        for warning in &signal.warnings {
            let _ = writeln!(out, "  • {}", warning);
        }
        out.push('\n');
    }

    if signal.long_positions.is_empty() {
        out.push_str("📈 LONG positions: none\n");
    } else {
        out.push_str("📈 LONG positions:\n");
        for position in &signal.long_positions {
            let _ = writeln!(
                out,
                "  • {} ({}): {:+}",
                position.ticker, position.sector, position.score
            );
        }
    }

    out.push_str("\n📉 SHORT position:\n");
    match &signal.short_position {
        Some(position) => {
            let _ = writeln!(
                out,
                "  • {} ({}): {:+}",
                position.ticker, position.sector, position.score
            );
        }
        None => out.push_str("  • none\n"),
    }

    write_top_scores(&mut out, signal);
    out
}

fn write_top_scores(out: &mut String, signal: &Signal) {
    let _ = writeln!(out, "\n📊 Sector scores (top {}):", TOP_SECTORS);
    for (sector, score) in signal.all_scores.iter().take(TOP_SECTORS) {
        let _ = writeln!(out, "  • {}: {:+}", sector, score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::signal::generator::SignalGenerator;
    use crate::domain::scores::SectorScores;
    use crate::domain::sector::Sector;

    #[test]
    fn test_hold_message_lists_reason_and_top_five() {
        let signal = SignalGenerator::default().generate(&SectorScores::zero());

        let message = format_signal_message(&signal);

        assert!(message.contains("Action: HOLD | Confidence: N/A"));
        assert!(message.contains("No significant signal"));
        assert_eq!(message.matches("  • ").count(), 5);
        assert!(!message.contains("LONG"));
    }

    #[test]
    fn test_trade_message_renders_positions_with_sign() {
        let scores = SectorScores::zero()
            .with(Sector::Technology, 25)
            .with(Sector::Energy, -12)
            .with(Sector::Financials, 3);
        let signal = SignalGenerator::default().generate(&scores);

        let message = format_signal_message(&signal);

        assert!(message.contains("Action: WEAK_SIGNAL | Confidence: LOW"));
        assert!(message.contains("⚠️ Warnings:\n  • Insufficient long candidates"));
        assert!(message.contains("  • XLK (Technology): +25\n"));
        assert!(message.contains("  • XLE (Energy): -12\n"));
        assert!(message.contains("  • Financials: +3\n"));
    }

    #[test]
    fn test_short_only_message() {
        let scores = SectorScores::zero().with(Sector::Airlines, -9);
        let signal = SignalGenerator::default().generate(&scores);

        let message = format_signal_message(&signal);

        assert!(message.contains("📈 LONG positions: none"));
        assert!(message.contains("  • JETS (Airlines): -9"));
        assert!(!message.contains("Warnings"));
    }
}
