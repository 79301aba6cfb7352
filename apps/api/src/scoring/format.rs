//! Pure Markdown rendering of match reports for the conversational surface.

use crate::posting::OrganizationName;
use crate::scoring::report::MatchReport;

const BAR_CELLS: u8 = 10;

/// Ten-cell proportional bar, one filled cell per ten points.
fn score_bar(score: u8) -> String {
    let filled = score.min(100) / 10;
    format!(
        "{}{}",
        "█".repeat(filled as usize),
        "░".repeat((BAR_CELLS - filled) as usize)
    )
}

/// Renders the match analysis shown right after scoring.
pub fn format_match_report(report: &MatchReport) -> String {
    let band = report.band();
    let mut msg = String::from("## 📊 Match Analysis\n\n");
    msg.push_str(&format!(
        "### {} Overall match: **{}%** – {}\n\n",
        band.marker(),
        report.overall_score,
        band.label()
    ));

    if !report.strengths.is_empty() {
        msg.push_str("**✅ Strengths:**\n");
        for s in &report.strengths {
            msg.push_str(&format!("- {}: {} {}%\n", s.skill, score_bar(s.score), s.score));
        }
    }

    if !report.gaps.is_empty() {
        msg.push_str("\n**⚠️ Gap analysis:**\n");
        for g in &report.gaps {
            msg.push_str(&format!(
                "- {}: {}% (not strongly represented in the CV)\n",
                g.skill, g.score
            ));
        }
    }

    if !report.recommendation.is_empty() {
        msg.push_str(&format!("\n**💡 Recommendation:** {}", report.recommendation));
    }

    msg
}

/// Renders the closing message once both documents have been produced.
pub fn format_closing_summary(
    organization: &OrganizationName,
    report: &MatchReport,
    file_names: &[String],
) -> String {
    let mut msg = format!(
        "## 🎉 Your application for **{}** is ready!\n\n",
        organization.display_name()
    );

    for name in file_names {
        msg.push_str(&format!("📄 `{name}`\n"));
    }

    msg.push_str(&format!(
        "\n**Match score: {}%** {}\n",
        report.overall_score,
        report.band().marker()
    ));

    if !report.gaps.is_empty() {
        let gap_names = report
            .gaps
            .iter()
            .map(|g| g.skill.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        msg.push_str(&format!(
            "\n💡 **Tip:** Mention in your application how you are building these skills: {gap_names}\n"
        ));
    }

    msg.push_str("\nGood luck with your application! 🍀");
    msg
}
