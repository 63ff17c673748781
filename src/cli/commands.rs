//! Command implementations for the Bibliotopic CLI.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;
use std::time::Instant;

use log::{info, warn};

use crate::cli::args::*;
use crate::cli::output::*;
use crate::collection::CollectionAlgebra;
use crate::document::converter::json::JsonPaperConverter;
use crate::document::converter::{PaperConverter, PaperRecord};
use crate::document::{GroupId, PaperGroup, PaperId};
use crate::error::{BibliotopicError, Result};
use crate::query::PaperFilter;
use crate::storage::PaperRepository;
use crate::storage::memory::MemoryRepository;
use crate::topic::pipeline::TopicDiscovery;
use crate::topic::{DiscoveryConfig, TopicId};

/// Execute a CLI command.
pub fn execute_command(args: BibliotopicArgs) -> Result<()> {
    match &args.command {
        Command::Load(load_args) => load_papers(load_args, &args),
        Command::Discover(discover_args) => discover_topics(discover_args, &args),
        Command::Topics(store_args) => list_topics(store_args, &args),
        Command::Group(group_args) => create_group(group_args, &args),
        Command::Groups(store_args) => list_groups(store_args, &args),
        Command::DeleteGroup(delete_args) => delete_group(delete_args, &args),
        Command::Combine(combine_args) => combine_groups(combine_args, &args),
        Command::Search(search_args) => search_papers(search_args, &args),
    }
}

/// Insert records into the repository, skipping DOIs that are already stored.
pub fn import_records(repo: &dyn PaperRepository, records: Vec<PaperRecord>) -> Result<LoadResult> {
    let start = Instant::now();
    let records_read = records.len();
    let mut known_dois: HashSet<String> = repo
        .papers()?
        .into_iter()
        .filter_map(|paper| paper.doi)
        .collect();

    let mut next_id = repo.next_paper_id()?;
    let mut papers_inserted = 0;
    let mut duplicates_skipped = 0;

    for record in records {
        let paper = record.into_paper(next_id);
        if let Some(doi) = &paper.doi
            && !known_dois.insert(doi.clone())
        {
            duplicates_skipped += 1;
            continue;
        }
        repo.insert_paper(paper)?;
        papers_inserted += 1;
        next_id = PaperId(next_id.0 + 1);
    }

    if duplicates_skipped > 0 {
        warn!("Skipped {duplicates_skipped} papers whose DOI is already stored");
    }

    Ok(LoadResult {
        records_read,
        papers_inserted,
        duplicates_skipped,
        duration_ms: start.elapsed().as_millis() as u64,
    })
}

/// Import papers into a store file.
fn load_papers(args: &LoadArgs, cli_args: &BibliotopicArgs) -> Result<()> {
    info!("Loading papers from {}", args.input.display());

    let repo = MemoryRepository::open(&args.store)?;
    let records = JsonPaperConverter::new().convert(&args.input)?;
    let result = import_records(&repo, records)?;
    repo.save(&args.store)?;

    output_result("Papers loaded", &result, cli_args)
}

/// Read a discovery configuration file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<DiscoveryConfig> {
    let data = fs::read_to_string(path.as_ref())?;
    let config: DiscoveryConfig = serde_json::from_str(&data)?;
    config.validate()?;
    Ok(config)
}

/// Run topic discovery on a store file.
fn discover_topics(args: &DiscoverArgs, cli_args: &BibliotopicArgs) -> Result<()> {
    let start = Instant::now();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => DiscoveryConfig::default(),
    };
    if let Some(path) = &args.visualization {
        config.visualization_path = Some(path.clone());
    }
    if args.no_visualization {
        config.visualization_path = None;
    }
    if let Some(seed) = args.seed {
        config.lda.seed = seed;
    }
    if args.sequential {
        config.selection.parallel = false;
    }

    let repo = MemoryRepository::load(&args.store)?;
    let discovery = TopicDiscovery::new(config)?;
    let report = discovery.run(&repo)?;
    repo.save(&args.store)?;

    let result = DiscoveryResult {
        run_id: report.run.id.0,
        num_topics: report.run.num_topics,
        coherence: report.run.coherence.clone(),
        topics: report
            .topics
            .iter()
            .map(|topic| TopicSummary::new(topic, report.topic_sizes[topic.id.index]))
            .collect(),
        empty_documents: report.empty_documents,
        visualization: discovery
            .config()
            .visualization_path
            .as_ref()
            .map(|path| path.display().to_string()),
        duration_ms: start.elapsed().as_millis() as u64,
    };

    output_result("Topic discovery finished", &result, cli_args)
}

/// List the current topics and how many papers each holds.
pub fn topic_listing(repo: &dyn PaperRepository) -> Result<TopicListing> {
    let run = repo.current_run()?;
    let topics = repo.topics()?;

    let mut counts: BTreeMap<TopicId, usize> = BTreeMap::new();
    let mut unassigned = 0;
    for paper in repo.papers()? {
        match paper.topic {
            Some(topic) => *counts.entry(topic).or_insert(0) += 1,
            None => unassigned += 1,
        }
    }

    Ok(TopicListing {
        run_id: run.as_ref().map(|run| run.id.0),
        created_at: run.as_ref().map(|run| run.created_at.to_rfc3339()),
        topics: topics
            .iter()
            .map(|topic| TopicSummary::new(topic, counts.get(&topic.id).copied().unwrap_or(0)))
            .collect(),
        unassigned,
    })
}

fn list_topics(args: &StoreArgs, cli_args: &BibliotopicArgs) -> Result<()> {
    let repo = MemoryRepository::load(&args.store)?;
    output_result("Current topics", &topic_listing(&repo)?, cli_args)
}

/// Create a group from a selection of papers.
fn create_group(args: &GroupArgs, cli_args: &BibliotopicArgs) -> Result<()> {
    let name = args.name.trim();
    if name.is_empty() {
        return Err(BibliotopicError::invalid_config("group name must not be empty"));
    }

    let repo = MemoryRepository::load(&args.store)?;
    let mut group = PaperGroup::new(repo.next_group_id()?, name)
        .with_papers(args.papers.iter().map(|&id| PaperId(id)));
    if let Some(description) = &args.description {
        group = group.with_description(description.clone());
    }
    if let Some(owner) = &args.owner {
        group = group.with_owner(owner.clone());
    }

    repo.insert_group(group.clone())?;
    repo.save(&args.store)?;
    info!("Created group {} with {} papers", group.id, group.len());

    output_result("Group created", &GroupSummary::from(&group), cli_args)
}

fn list_groups(args: &StoreArgs, cli_args: &BibliotopicArgs) -> Result<()> {
    let repo = MemoryRepository::load(&args.store)?;
    let groups = GroupList {
        groups: repo.groups()?.iter().map(GroupSummary::from).collect(),
    };
    output_result("Groups", &groups, cli_args)
}

fn delete_group(args: &DeleteGroupArgs, cli_args: &BibliotopicArgs) -> Result<()> {
    let repo = MemoryRepository::load(&args.store)?;
    let group = repo.group(GroupId(args.group))?;
    repo.delete_group(group.id)?;
    repo.save(&args.store)?;

    output_result("Group deleted", &GroupSummary::from(&group), cli_args)
}

/// Combine two groups.
fn combine_groups(args: &CombineArgs, cli_args: &BibliotopicArgs) -> Result<()> {
    let repo = MemoryRepository::load(&args.store)?;
    let papers = CollectionAlgebra::new().combine(
        &repo,
        GroupId(args.first),
        GroupId(args.second),
        &args.operation,
    )?;

    output_result(
        &format!(
            "{} of groups {} and {}",
            args.operation, args.first, args.second
        ),
        &PaperList::new(&papers),
        cli_args,
    )
}

/// Build a filter from search arguments, resolving the topic index against
/// the current run.
pub fn build_filter(repo: &dyn PaperRepository, args: &SearchArgs) -> Result<PaperFilter> {
    let topic = match args.topic {
        Some(index) => {
            let run = repo
                .current_run()?
                .ok_or_else(|| BibliotopicError::not_found("no topic discovery run"))?;
            Some(TopicId::new(run.id, index))
        }
        None => None,
    };

    Ok(PaperFilter {
        query: args.query.clone(),
        year: args.year,
        keyword: args.keyword.clone(),
        group: args.group.map(GroupId),
        topic,
    })
}

fn search_papers(args: &SearchArgs, cli_args: &BibliotopicArgs) -> Result<()> {
    let repo = MemoryRepository::load(&args.store)?;
    let papers = build_filter(&repo, args)?.apply(&repo)?;
    output_result("Search results", &PaperList::new(&papers), cli_args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::converter::AuthorsField;

    fn record(title: &str, doi: Option<&str>) -> PaperRecord {
        PaperRecord {
            title: title.to_string(),
            abstract_text: Some("Vaccine trial".to_string()),
            authors: Some(AuthorsField::Text("Smith J, Doe A, ".to_string())),
            year: Some(2021),
            journal: None,
            doi: doi.map(str::to_string),
            factor: None,
            citations: None,
            pmid: None,
            categories: Some("Immunology | Virology|Immunology".to_string()),
        }
    }

    #[test]
    fn test_import_skips_known_dois() {
        let repo = MemoryRepository::new();
        let first = import_records(
            &repo,
            vec![record("A", Some("10.1/a")), record("B", None)],
        )
        .unwrap();
        assert_eq!(first.papers_inserted, 2);

        let second = import_records(
            &repo,
            vec![
                record("A again", Some("10.1/a")),
                record("C", Some("10.1/c")),
                record("C twice", Some("10.1/c")),
            ],
        )
        .unwrap();
        assert_eq!(second.records_read, 3);
        assert_eq!(second.papers_inserted, 1);
        assert_eq!(second.duplicates_skipped, 2);

        let papers = repo.papers().unwrap();
        let ids: Vec<u64> = papers.iter().map(|p| p.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(papers[0].authors, vec!["Smith J", "Doe A"]);
        assert_eq!(papers[0].categories, vec!["Immunology", "Virology"]);
    }

    #[test]
    fn test_topic_listing_without_run() {
        let repo = MemoryRepository::new();
        import_records(&repo, vec![record("A", None)]).unwrap();

        let listing = topic_listing(&repo).unwrap();
        assert!(listing.run_id.is_none());
        assert!(listing.topics.is_empty());
        assert_eq!(listing.unassigned, 1);
    }

    fn search_args(topic: Option<usize>) -> SearchArgs {
        SearchArgs {
            store: "store.json".into(),
            query: None,
            year: None,
            keyword: None,
            group: None,
            topic,
        }
    }

    #[test]
    fn test_search_topic_uses_listed_index() {
        use crate::topic::{RunId, Topic, TopicKeyword, TopicModelRun};

        let repo = MemoryRepository::new();
        import_records(
            &repo,
            vec![record("Vaccine", None), record("Climate", None), record("Carbon", None)],
        )
        .unwrap();
        let ids: Vec<PaperId> = repo.papers().unwrap().iter().map(|p| p.id).collect();

        let run = RunId(1);
        let topics = ["vaccine", "climate"]
            .iter()
            .enumerate()
            .map(|(index, word)| {
                Topic::from_keywords(
                    TopicId::new(run, index),
                    vec![TopicKeyword {
                        word: word.to_string(),
                        weight: 1.0,
                    }],
                )
            })
            .collect();
        let assignments = vec![
            (ids[0], TopicId::new(run, 0)),
            (ids[1], TopicId::new(run, 1)),
            (ids[2], TopicId::new(run, 1)),
        ];
        repo.commit_run(
            TopicModelRun {
                id: run,
                min_topics: 2,
                max_topics: 2,
                step: 1,
                coherence: Vec::new(),
                num_topics: 2,
                created_at: chrono::Utc::now(),
            },
            topics,
            &assignments,
        )
        .unwrap();

        let listing = topic_listing(&repo).unwrap();
        let climate = listing
            .topics
            .iter()
            .find(|topic| topic.name == "climate")
            .unwrap();
        assert_eq!(climate.index, 1);

        let filter = build_filter(&repo, &search_args(Some(climate.index))).unwrap();
        assert_eq!(filter.topic, Some(TopicId::new(run, 1)));

        let found = PaperList::new(&filter.apply(&repo).unwrap());
        let titles: Vec<&str> = found.papers.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Climate", "Carbon"]);
        assert!(found.papers.iter().all(|p| p.topic == Some(climate.index)));

        let past_last = build_filter(&repo, &search_args(Some(2))).unwrap();
        assert!(past_last.apply(&repo).unwrap_err().is_not_found());
    }

    #[test]
    fn test_search_topic_without_run() {
        let repo = MemoryRepository::new();
        let result = build_filter(&repo, &search_args(Some(0)));
        assert!(result.unwrap_err().is_not_found());
    }

    #[test]
    fn test_build_filter_requires_run_for_topic() {
        let repo = MemoryRepository::new();
        let args = SearchArgs {
            store: "store.json".into(),
            query: Some("vaccine".to_string()),
            year: None,
            keyword: None,
            group: Some(3),
            topic: Some(0),
        };
        assert!(build_filter(&repo, &args).unwrap_err().is_not_found());

        let args = SearchArgs { topic: None, ..args };
        let filter = build_filter(&repo, &args).unwrap();
        assert_eq!(filter.group, Some(GroupId(3)));
        assert_eq!(filter.query.as_deref(), Some("vaccine"));
    }
}
