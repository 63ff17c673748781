//! Output formatting for CLI commands.

use serde::Serialize;

use crate::cli::args::{BibliotopicArgs, OutputFormat};
use crate::document::{Paper, PaperGroup};
use crate::error::Result;
use crate::topic::{CandidateScore, Topic};

/// Human-readable rendering of a command result.
pub trait HumanOutput {
    fn print_human(&self);
}

/// Result structure for paper import.
#[derive(Debug, Serialize)]
pub struct LoadResult {
    pub records_read: usize,
    pub papers_inserted: usize,
    pub duplicates_skipped: usize,
    pub duration_ms: u64,
}

/// A topic with the number of papers assigned to it.
#[derive(Debug, Serialize)]
pub struct TopicSummary {
    pub index: usize,
    pub name: String,
    pub papers: usize,
}

impl TopicSummary {
    pub fn new(topic: &Topic, papers: usize) -> Self {
        TopicSummary {
            index: topic.id.index,
            name: topic.name.clone(),
            papers,
        }
    }
}

/// Result structure for topic discovery.
#[derive(Debug, Serialize)]
pub struct DiscoveryResult {
    pub run_id: u64,
    pub num_topics: usize,
    pub coherence: Vec<CandidateScore>,
    pub topics: Vec<TopicSummary>,
    pub empty_documents: usize,
    pub visualization: Option<String>,
    pub duration_ms: u64,
}

/// Topics of the current run.
#[derive(Debug, Serialize)]
pub struct TopicListing {
    pub run_id: Option<u64>,
    pub created_at: Option<String>,
    pub topics: Vec<TopicSummary>,
    pub unassigned: usize,
}

/// Short form of a paper.
#[derive(Debug, Serialize)]
pub struct PaperSummary {
    pub id: u64,
    pub title: String,
    pub year: Option<i32>,
    pub authors: Vec<String>,
    pub topic: Option<usize>,
}

impl From<&Paper> for PaperSummary {
    fn from(paper: &Paper) -> Self {
        PaperSummary {
            id: paper.id.0,
            title: paper.title.clone(),
            year: paper.year,
            authors: paper.authors.clone(),
            topic: paper.topic.map(|topic| topic.index),
        }
    }
}

/// A list of papers.
#[derive(Debug, Serialize)]
pub struct PaperList {
    pub total: usize,
    pub papers: Vec<PaperSummary>,
}

impl PaperList {
    pub fn new(papers: &[Paper]) -> Self {
        PaperList {
            total: papers.len(),
            papers: papers.iter().map(PaperSummary::from).collect(),
        }
    }
}

/// Short form of a group.
#[derive(Debug, Serialize)]
pub struct GroupSummary {
    pub id: u64,
    pub name: String,
    pub owner: Option<String>,
    pub papers: Vec<u64>,
}

impl From<&PaperGroup> for GroupSummary {
    fn from(group: &PaperGroup) -> Self {
        GroupSummary {
            id: group.id.0,
            name: group.name.clone(),
            owner: group.owner.clone(),
            papers: group.papers.iter().map(|id| id.0).collect(),
        }
    }
}

/// A list of groups.
#[derive(Debug, Serialize)]
pub struct GroupList {
    pub groups: Vec<GroupSummary>,
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize + HumanOutput>(
    message: &str,
    result: &T,
    args: &BibliotopicArgs,
) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            if args.verbosity() > 0 {
                println!("{message}");
                println!();
            }
            result.print_human();
            Ok(())
        }
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &BibliotopicArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    println!("{json}");
    Ok(())
}

impl HumanOutput for LoadResult {
    fn print_human(&self) {
        println!("Records read:       {}", self.records_read);
        println!("Papers inserted:    {}", self.papers_inserted);
        println!("Duplicates skipped: {}", self.duplicates_skipped);
        println!("Duration:           {}ms", self.duration_ms);
    }
}

fn print_topics(topics: &[TopicSummary]) {
    for topic in topics {
        println!(
            "  Topic {:>2} ({:>4} papers): {}",
            topic.index,
            topic.papers,
            topic.name
        );
    }
}

impl HumanOutput for DiscoveryResult {
    fn print_human(&self) {
        println!("Run {}: {} topics", self.run_id, self.num_topics);
        println!("Coherence by topic count:");
        for score in &self.coherence {
            let marker = if score.num_topics == self.num_topics {
                " *"
            } else {
                ""
            };
            println!("  {:>2}: {:.4}{marker}", score.num_topics, score.coherence);
        }
        println!("Topics:");
        print_topics(&self.topics);
        if self.empty_documents > 0 {
            println!("Papers without terms: {}", self.empty_documents);
        }
        if let Some(path) = &self.visualization {
            println!("Visualization: {path}");
        }
        println!("Duration: {}ms", self.duration_ms);
    }
}

impl HumanOutput for TopicListing {
    fn print_human(&self) {
        match (self.run_id, &self.created_at) {
            (Some(run), Some(created)) => println!("Run {run} ({created})"),
            (Some(run), None) => println!("Run {run}"),
            _ => {
                println!("No topic discovery run yet.");
                return;
            }
        }
        print_topics(&self.topics);
        if self.unassigned > 0 {
            println!("Unassigned papers: {}", self.unassigned);
        }
    }
}

impl HumanOutput for PaperList {
    fn print_human(&self) {
        if self.papers.is_empty() {
            println!("No papers found.");
            return;
        }
        for paper in &self.papers {
            let year = paper.year.map(|y| y.to_string()).unwrap_or_else(|| "----".to_string());
            let topic = paper
                .topic
                .map(|t| format!(" [topic {t}]"))
                .unwrap_or_default();
            println!("{:>6}  {year}  {}{topic}", paper.id, paper.title);
            if !paper.authors.is_empty() {
                println!("        {}", paper.authors.join(", "));
            }
        }
        println!();
        println!("{} papers", self.total);
    }
}

impl HumanOutput for GroupSummary {
    fn print_human(&self) {
        let members: Vec<String> = self.papers.iter().map(u64::to_string).collect();
        println!(
            "{:>4}  {} ({} papers: {})",
            self.id,
            self.name,
            self.papers.len(),
            members.join(", ")
        );
    }
}

impl HumanOutput for GroupList {
    fn print_human(&self) {
        if self.groups.is_empty() {
            println!("No groups.");
        }
        for group in &self.groups {
            group.print_human();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::PaperId;

    #[test]
    fn test_paper_summary() {
        let paper = Paper::new(PaperId(7), "Carbon taxes")
            .with_year(2022)
            .with_authors(vec!["Doe J".to_string()]);
        let list = PaperList::new(&[paper]);

        assert_eq!(list.total, 1);
        let json = serde_json::to_value(&list).unwrap();
        assert_eq!(json["papers"][0]["id"], 7);
        assert_eq!(json["papers"][0]["year"], 2022);
        assert!(json["papers"][0]["topic"].is_null());
    }

    #[test]
    fn test_group_summary() {
        let group = PaperGroup::new(crate::document::GroupId(2), "climate")
            .with_papers([PaperId(4), PaperId(1)]);
        let summary = GroupSummary::from(&group);
        assert_eq!(summary.papers, vec![1, 4]);
    }
}
