//! Integration tests for the topic discovery pipeline.

use std::io::Write;

use tempfile::{NamedTempFile, TempDir};

use bibliotopic::cli::commands::{import_records, topic_listing};
use bibliotopic::document::converter::PaperConverter;
use bibliotopic::document::converter::json::JsonPaperConverter;
use bibliotopic::error::{BibliotopicError, Result};
use bibliotopic::prelude::*;

const VACCINE_ABSTRACTS: [&str; 3] = [
    "Vaccine efficacy in a dose trial: antibody response and immunity.",
    "Antibody immunity after each vaccine dose; efficacy of the trial.",
    "A trial of vaccine dose efficacy measuring immunity and antibody titres.",
];

const CLIMATE_ABSTRACTS: [&str; 7] = [
    "Climate policy for carbon emission cuts, warming limits and renewable energy.",
    "Renewable energy and carbon policy shape emission paths under climate warming.",
    "Warming, climate policy, renewable energy and the carbon emission budget.",
    "Carbon emission pricing as climate policy to curb warming with renewable energy.",
    "Energy policy: renewable climate targets, carbon emission and warming.",
    "Emission of carbon, warming of the climate, and renewable energy policy.",
    "Climate warming demands carbon policy, emission cuts and renewable energy.",
];

fn corpus_repository() -> Result<(MemoryRepository, Vec<PaperId>, Vec<PaperId>)> {
    let repo = MemoryRepository::new();
    let mut vaccine = Vec::new();
    let mut climate = Vec::new();

    for (i, text) in VACCINE_ABSTRACTS.iter().enumerate() {
        let id = repo.insert_paper(
            Paper::new(PaperId(i as u64 + 1), format!("Vaccine study {i}")).with_abstract(*text),
        )?;
        vaccine.push(id);
    }
    for (i, text) in CLIMATE_ABSTRACTS.iter().enumerate() {
        let id = repo.insert_paper(
            Paper::new(PaperId(i as u64 + 10), format!("Climate study {i}")).with_abstract(*text),
        )?;
        climate.push(id);
    }

    Ok((repo, vaccine, climate))
}

fn config() -> DiscoveryConfig {
    let mut config = DiscoveryConfig::default();
    config.lda.passes = 50;
    config.coherence.top_n = 5;
    config.selection.num_threads = Some(2);
    config.visualization_path = None;
    config
}

#[test]
fn test_vaccine_and_climate_papers_separate() -> Result<()> {
    let (repo, vaccine, climate) = corpus_repository()?;
    let report = TopicDiscovery::new(config())?.run(&repo)?;

    assert_eq!(report.run.num_topics, 2);
    assert_eq!(report.run.min_topics, 2);
    assert_eq!(report.run.max_topics, 8);
    assert_eq!(report.run.coherence.len(), 7);

    let vaccine_topic = repo.paper(vaccine[0])?.topic.unwrap();
    let climate_topic = repo.paper(climate[0])?.topic.unwrap();
    assert_ne!(vaccine_topic, climate_topic);

    for id in &vaccine {
        assert_eq!(repo.paper(*id)?.topic, Some(vaccine_topic));
    }
    for id in &climate {
        assert_eq!(repo.paper(*id)?.topic, Some(climate_topic));
    }

    let vaccine_name = &repo.topic(vaccine_topic)?.name;
    assert!(vaccine_name.contains("vaccine") || vaccine_name.contains("antibody"));
    assert_eq!(vaccine_name.split(", ").count(), 5);

    Ok(())
}

#[test]
fn test_default_config_separates_and_repeats() -> Result<()> {
    let dir = TempDir::new()?;
    let default_config = || {
        let mut config = DiscoveryConfig::default();
        config.visualization_path = Some(dir.path().join("lda_visualization.html"));
        config
    };

    let (repo, vaccine, climate) = corpus_repository()?;
    let report = TopicDiscovery::new(default_config())?.run(&repo)?;

    let selected = report.run.num_topics;
    assert!((2..=8).contains(&selected));
    assert_eq!(report.topics.len(), selected);

    let vaccine_topics: Vec<TopicId> = vaccine
        .iter()
        .map(|id| repo.paper(*id).map(|paper| paper.topic.unwrap()))
        .collect::<Result<_>>()?;
    let climate_topics: Vec<TopicId> = climate
        .iter()
        .map(|id| repo.paper(*id).map(|paper| paper.topic.unwrap()))
        .collect::<Result<_>>()?;
    for topic in &vaccine_topics {
        assert!(!climate_topics.contains(topic));
    }

    let (second_repo, _, _) = corpus_repository()?;
    let second = TopicDiscovery::new(default_config())?.run(&second_repo)?;
    assert_eq!(second.run.num_topics, selected);
    assert_eq!(second.run.coherence, report.run.coherence);
    assert_eq!(second.assignments, report.assignments);

    Ok(())
}

#[test]
fn test_selection_is_deterministic() -> Result<()> {
    let (first_repo, _, _) = corpus_repository()?;
    let (second_repo, _, _) = corpus_repository()?;

    let first = TopicDiscovery::new(config())?.run(&first_repo)?;
    let second = TopicDiscovery::new(config())?.run(&second_repo)?;

    assert_eq!(first.run.num_topics, second.run.num_topics);
    assert_eq!(first.run.coherence, second.run.coherence);
    assert_eq!(first.assignments, second.assignments);

    Ok(())
}

#[test]
fn test_rerun_replaces_previous_generation() -> Result<()> {
    let (repo, _, _) = corpus_repository()?;
    let discovery = TopicDiscovery::new(config())?;

    let first = discovery.run(&repo)?;
    let second = discovery.run(&repo)?;
    assert!(second.run.id > first.run.id);

    let current = repo.current_run()?.unwrap();
    assert_eq!(current.id, second.run.id);
    for topic in repo.topics()? {
        assert_eq!(topic.id.run, current.id);
    }
    for paper in repo.papers()? {
        let topic = paper.topic.unwrap();
        assert_eq!(topic.run, current.id);
        assert!(repo.topic(topic).is_ok());
    }

    Ok(())
}

#[test]
fn test_papers_without_abstract_still_get_a_topic() -> Result<()> {
    let (repo, _, _) = corpus_repository()?;
    repo.insert_paper(Paper::new(PaperId(100), "Editorial"))?;

    let report = TopicDiscovery::new(config())?.run(&repo)?;
    assert_eq!(report.empty_documents, 1);

    let topic = repo.paper(PaperId(100))?.topic.unwrap();
    assert_eq!(topic.index, 0);
    assert_eq!(topic.run, report.run.id);

    Ok(())
}

#[test]
fn test_corpus_without_terms_is_too_small() -> Result<()> {
    let repo = MemoryRepository::new();
    repo.insert_paper(Paper::new(PaperId(1), "No abstract"))?;
    repo.insert_paper(Paper::new(PaperId(2), "Numbers only").with_abstract("2020 2021 (3)."))?;

    let result = TopicDiscovery::new(config())?.run(&repo);
    assert!(matches!(result, Err(BibliotopicError::CorpusTooSmall(_))));
    assert!(repo.current_run()?.is_none());

    Ok(())
}

#[test]
fn test_visualization_is_written() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("lda_visualization.html");
    let mut config = config();
    config.visualization_path = Some(path.clone());

    let (repo, _, _) = corpus_repository()?;
    TopicDiscovery::new(config)?.run(&repo)?;

    let html = std::fs::read_to_string(&path)?;
    assert!(html.contains("<h1>Run 1: 2 topics</h1>"));

    Ok(())
}

#[test]
fn test_store_round_trip_through_json_import() -> Result<()> {
    let mut input = NamedTempFile::new()?;
    for (i, text) in VACCINE_ABSTRACTS.iter().chain(CLIMATE_ABSTRACTS.iter()).enumerate() {
        let record = serde_json::json!({
            "title": format!("Paper {i}"),
            "abstract": text,
            "authors": "Doe J, Roe R, ",
            "year": 2020 + (i as i32 % 3),
            "doi": format!("10.1000/{i}"),
        });
        writeln!(input, "{record}")?;
    }
    input.flush()?;

    let dir = TempDir::new()?;
    let store = dir.path().join("store.json");

    let repo = MemoryRepository::open(&store)?;
    let records = JsonPaperConverter::new().convert(input.path())?;
    let loaded = import_records(&repo, records)?;
    assert_eq!(loaded.papers_inserted, 10);
    repo.save(&store)?;

    let repo = MemoryRepository::load(&store)?;
    let report = TopicDiscovery::new(config())?.run(&repo)?;
    repo.save(&store)?;

    let reloaded = MemoryRepository::load(&store)?;
    let listing = topic_listing(&reloaded)?;
    assert_eq!(listing.run_id, Some(report.run.id.0));
    assert_eq!(listing.unassigned, 0);
    assert_eq!(
        listing.topics.iter().map(|t| t.papers).sum::<usize>(),
        10
    );

    Ok(())
}
