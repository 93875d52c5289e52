//! End-to-end tests for the analysis pipeline

use agreement_core::loader::load_items;
use agreement_core::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const HEADER: &str = "source,tokenization_type,word_number,article_type,lemma,sentence,word_form,affix,article_number,article_probs,surprisal";

fn write(dir: &Path, name: &str, rows: &[&str]) -> PathBuf {
    let path = dir.join(name);
    let mut content = String::from(HEADER);
    content.push('\n');
    for row in rows {
        content.push_str(row);
        content.push('\n');
    }
    fs::write(&path, content).unwrap();
    path
}

/// Three small result files covering every tokenization family
fn fixture(dir: &Path) -> InputPaths {
    let single_token = write(
        dir,
        "single.csv",
        &[
            "single-token,default,singular,definite,gato,1,gato,,singular,0.8,0.3219",
            "single-token,default,singular,definite,gato,1,gato,,plural,0.2,2.3219",
            "single-token,default,plural,definite,gato,2,gatos,s,singular,0.1,3.3219",
            "single-token,default,plural,definite,gato,2,gatos,s,plural,0.9,0.152",
        ],
    );
    let multitok_nonmorph = write(
        dir,
        "nonmorph.csv",
        &[
            "multitok-nonmorph,artificial,plural,indefinite,mesa,3,mesas,s,singular,0.6,0.737",
            "multitok-nonmorph,artificial,plural,indefinite,mesa,3,mesas,s,plural,0.4,1.3219",
        ],
    );
    let multitok_morph = write(
        dir,
        "morph.csv",
        &[
            "multitok-morph,morphemic,compositional_plural,definite,flor,4,flores,es,singular,0.25,2.0",
            "multitok-morph,morphemic,compositional_plural,definite,flor,4,flores,es,plural,0.75,0.415",
            "multitok-morph,artificial,compositional_plural,definite,flor,4,flores,es,singular,0.5,1.0",
            "multitok-morph,artificial,compositional_plural,definite,flor,4,flores,es,plural,0.5,1.0",
        ],
    );

    InputPaths {
        single_token,
        multitok_nonmorph,
        multitok_morph,
    }
}

#[test]
fn test_run_produces_scored_wide_table() {
    let dir = TempDir::new().unwrap();
    let config = PipelineConfig::new(fixture(dir.path()), dir.path().join("wide.csv"));

    let output = Pipeline::new(config).unwrap().run().unwrap();

    assert_eq!(output.report.single_token_rows, 4);
    assert_eq!(output.report.multitok_nonmorph_rows, 2);
    assert_eq!(output.report.multitok_morph_rows, 4);
    assert_eq!(output.report.artificial_excluded, 2);
    assert_eq!(output.report.merged_rows, 8);
    assert!(output.report.reshape.is_clean());
    assert_eq!(output.items.len(), 4);
    assert_eq!(output.report.scored_items, 4);

    // flor < gato (x2) < mesa
    let forms: Vec<&str> = output.items.iter().map(|i| i.key.word_form.as_str()).collect();
    assert_eq!(forms, vec!["flores", "gato", "gatos", "mesas"]);

    let accuracy: Vec<Option<u8>> = output.items.iter().map(|i| i.accuracy).collect();
    assert_eq!(accuracy, vec![Some(1), Some(1), Some(1), Some(0)]);

    let gato = &output.items[1];
    assert!((gato.log_odds.unwrap() - 0.25f64.ln()).abs() < 1e-12);

    for item in &output.items {
        assert_eq!(
            item.surprisal_diff.unwrap(),
            item.surprisal_plural.unwrap() - item.surprisal_singular.unwrap()
        );
    }

    // artificial rows from the nonmorph file survive the merge
    assert!(output
        .merged
        .iter()
        .any(|o| o.source == "multitok-nonmorph" && o.tokenization_type == "artificial"));
    assert!(!output
        .merged
        .iter()
        .any(|o| o.source == "multitok-morph" && o.tokenization_type == "artificial"));
}

#[test]
fn test_execute_writes_wide_and_merged_tables() {
    let dir = TempDir::new().unwrap();
    let wide = dir.path().join("out").join("wide.csv");
    let long = dir.path().join("out").join("merged.csv");
    let config =
        PipelineConfig::new(fixture(dir.path()), &wide).with_merged_output(&long);

    let output = Pipeline::new(config).unwrap().execute().unwrap();

    let loaded = load_items(&wide).unwrap();
    assert_eq!(loaded, output.items);
    let merged = agreement_core::loader::load_observations(&long).unwrap();
    assert_eq!(merged, output.merged);
}

#[test]
fn test_frequency_join_restricts_items() {
    let dir = TempDir::new().unwrap();
    let frequency = dir.path().join("freq.csv");
    fs::write(
        &frequency,
        "Word,Log10(freq count+1)\ngato,4.1\ngatos,3.2\nflor,3.9\nmesa,4.4\n",
    )
    .unwrap();
    let wide = dir.path().join("wide.csv");
    let config = PipelineConfig::new(fixture(dir.path()), &wide)
        .with_frequency(&frequency, FrequencyColumns::default());

    let pipeline = Pipeline::new(config).unwrap();
    let output = pipeline.execute().unwrap();

    let joined = output.joined.as_ref().unwrap();
    let forms: Vec<&str> = joined.iter().map(|j| j.row.key.word_form.as_str()).collect();
    assert_eq!(forms, vec!["gato", "gatos"]);
    assert_eq!(joined[1].log_freq_lemma, 4.1);
    assert_eq!(joined[1].log_freq_wordform, 3.2);

    let warning = output.report.join.unwrap();
    assert_eq!(warning.input_rows, 4);
    assert_eq!(warning.dropped, 2);
    assert_eq!(warning.missing_wordform, 2);
    assert_eq!(warning.missing_lemma, 0);

    let content = fs::read_to_string(&wide).unwrap();
    assert!(content.lines().next().unwrap().ends_with("log_freq_lemma,log_freq_wordform"));
    assert_eq!(content.lines().count(), 3);
}

#[test]
fn test_strict_mode_fails_on_incomplete_item() {
    let dir = TempDir::new().unwrap();
    let mut inputs = fixture(dir.path());
    inputs.single_token = write(
        dir.path(),
        "single-broken.csv",
        &["single-token,default,singular,definite,gato,1,gato,,singular,0.8,0.3219"],
    );
    let wide = dir.path().join("wide.csv");

    let lenient = Pipeline::new(PipelineConfig::new(inputs.clone(), &wide))
        .unwrap()
        .run()
        .unwrap();
    assert_eq!(lenient.report.reshape.incomplete_items, 1);
    assert_eq!(lenient.report.scored_items, 2);

    let strict = Pipeline::new(PipelineConfig::new(inputs, &wide).strict(true)).unwrap();
    assert!(matches!(
        strict.execute(),
        Err(CoreError::MalformedGroup { .. })
    ));
    assert!(!wide.exists());
}

#[test]
fn test_schema_error_aborts_run() {
    let dir = TempDir::new().unwrap();
    let mut inputs = fixture(dir.path());
    let broken = dir.path().join("broken.csv");
    fs::write(&broken, "source,lemma\nsingle-token,gato\n").unwrap();
    inputs.multitok_nonmorph = broken;

    let result = Pipeline::new(PipelineConfig::new(inputs, dir.path().join("wide.csv")))
        .unwrap()
        .run();
    match result {
        Err(CoreError::Schema { missing, .. }) => assert_eq!(missing.len(), 9),
        other => panic!("expected schema error, got {other:?}"),
    }
}

#[test]
fn test_headers_are_checked_before_rows_are_parsed() {
    let dir = TempDir::new().unwrap();
    let mut inputs = fixture(dir.path());
    inputs.single_token = write(
        dir.path(),
        "bad-row.csv",
        &["single-token,default,singular,definite,gato,1,gato,,singular,high,0.3219"],
    );
    let broken = dir.path().join("broken.csv");
    fs::write(&broken, "source,lemma\nmultitok-morph,flor\n").unwrap();
    inputs.multitok_morph = broken.clone();

    let result = Pipeline::new(PipelineConfig::new(inputs, dir.path().join("wide.csv")))
        .unwrap()
        .run();
    match result {
        Err(CoreError::Schema { path, .. }) => assert_eq!(path, broken),
        other => panic!("expected schema error, got {other:?}"),
    }
}

#[test]
fn test_progress_callback_sees_every_stage() {
    let dir = TempDir::new().unwrap();
    let frequency = dir.path().join("freq.csv");
    fs::write(&frequency, "Word,Log10(freq count+1)\ngato,4.1\n").unwrap();
    let config = PipelineConfig::new(fixture(dir.path()), dir.path().join("wide.csv"))
        .with_frequency(&frequency, FrequencyColumns::default());

    let mut stages = Vec::new();
    Pipeline::new(config)
        .unwrap()
        .run_with_progress(|stage| stages.push(stage))
        .unwrap();
    assert_eq!(stages, Stage::ALL.to_vec());
}

#[test]
fn test_summary_of_run() {
    let dir = TempDir::new().unwrap();
    let config = PipelineConfig::new(fixture(dir.path()), dir.path().join("wide.csv"));
    let output = Pipeline::new(config).unwrap().run().unwrap();

    let summary = output.summary();
    assert_eq!(summary.conditions.len(), 4);
    assert_eq!(summary.overall.items, 4);
    assert_eq!(summary.overall.accuracy, Some(0.75));
}
