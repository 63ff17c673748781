//! Static visualization of a discovery run.
//!
//! The page lists every topic with its share of papers and its top terms,
//! drawn as plain HTML bars so it opens without any script or network
//! access.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use log::info;

use crate::error::{BibliotopicError, Result};
use crate::topic::assignment::AssignmentReport;

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Render the visualization page of a run.
pub fn render_visualization(report: &AssignmentReport) -> Result<String> {
    let total: usize = report.topic_sizes.iter().sum();
    let mut html = String::new();

    let fmt_err = |e: std::fmt::Error| BibliotopicError::other(format!("Failed to render: {e}"));

    writeln!(html, "<!DOCTYPE html>").map_err(fmt_err)?;
    writeln!(html, "<html><head><meta charset=\"utf-8\">").map_err(fmt_err)?;
    writeln!(html, "<title>Topic model run {}</title>", report.run.id).map_err(fmt_err)?;
    writeln!(
        html,
        "<style>body{{font-family:sans-serif;margin:2em}}.bar{{background:#4a7fb5;height:0.8em;display:inline-block}}td{{padding:2px 8px;vertical-align:top}}</style>"
    )
    .map_err(fmt_err)?;
    writeln!(html, "</head><body>").map_err(fmt_err)?;
    writeln!(
        html,
        "<h1>Run {}: {} topics</h1><p>Created {}. {} papers.</p>",
        report.run.id,
        report.run.num_topics,
        report.run.created_at.to_rfc3339(),
        total
    )
    .map_err(fmt_err)?;

    writeln!(html, "<h2>Coherence by topic count</h2><table>").map_err(fmt_err)?;
    for score in &report.run.coherence {
        writeln!(
            html,
            "<tr><td>{}</td><td>{:.4}</td></tr>",
            score.num_topics, score.coherence
        )
        .map_err(fmt_err)?;
    }
    writeln!(html, "</table>").map_err(fmt_err)?;

    for topic in &report.topics {
        let size = report.topic_sizes.get(topic.id.index).copied().unwrap_or(0);
        let share = if total == 0 {
            0.0
        } else {
            size as f64 / total as f64
        };

        writeln!(
            html,
            "<h2>Topic {}: {}</h2><p><span class=\"bar\" style=\"width:{:.1}em\"></span> {:.1}% ({} papers)</p>",
            topic.id.index,
            escape(&topic.name),
            share * 20.0,
            share * 100.0,
            size
        )
        .map_err(fmt_err)?;

        let max_weight = topic
            .keywords
            .first()
            .map(|keyword| keyword.weight)
            .unwrap_or(1.0)
            .max(f64::MIN_POSITIVE);
        writeln!(html, "<table>").map_err(fmt_err)?;
        for keyword in &topic.keywords {
            writeln!(
                html,
                "<tr><td>{}</td><td><span class=\"bar\" style=\"width:{:.1}em\"></span></td><td>{:.4}</td></tr>",
                escape(&keyword.word),
                keyword.weight / max_weight * 10.0,
                keyword.weight
            )
            .map_err(fmt_err)?;
        }
        writeln!(html, "</table>").map_err(fmt_err)?;
    }

    writeln!(html, "</body></html>").map_err(fmt_err)?;
    Ok(html)
}

/// Write the visualization page of a run to `path`.
pub fn write_visualization<P: AsRef<Path>>(path: P, report: &AssignmentReport) -> Result<()> {
    let path = path.as_ref();
    let html = render_visualization(report)?;
    fs::write(path, html)?;
    info!("Wrote topic visualization to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use tempfile::TempDir;

    use super::*;
    use crate::document::PaperId;
    use crate::topic::{CandidateScore, RunId, Topic, TopicId, TopicKeyword, TopicModelRun};

    fn report() -> AssignmentReport {
        let run = TopicModelRun {
            id: RunId(3),
            min_topics: 2,
            max_topics: 3,
            step: 1,
            coherence: vec![
                CandidateScore {
                    num_topics: 2,
                    coherence: 0.8,
                },
                CandidateScore {
                    num_topics: 3,
                    coherence: 0.4,
                },
            ],
            num_topics: 2,
            created_at: Utc::now(),
        };
        let topic = |index, word: &str| {
            Topic::from_keywords(
                TopicId::new(RunId(3), index),
                vec![TopicKeyword {
                    word: word.to_string(),
                    weight: 0.5,
                }],
            )
        };

        AssignmentReport {
            run,
            topics: vec![topic(0, "vaccine"), topic(1, "<script>")],
            assignments: vec![(PaperId(1), TopicId::new(RunId(3), 0))],
            topic_sizes: vec![3, 1],
            empty_documents: 0,
        }
    }

    #[test]
    fn test_render_lists_topics_and_shares() {
        let html = render_visualization(&report()).unwrap();

        assert!(html.contains("Run 3: 2 topics"));
        assert!(html.contains("Topic 0: vaccine"));
        assert!(html.contains("Topic 1: &lt;script&gt;"));
        assert!(html.contains("75.0% (3 papers)"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_write_visualization() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("lda_visualization.html");
        write_visualization(&path, &report()).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("<!DOCTYPE html>"));
    }
}
