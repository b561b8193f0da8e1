//! Pipeline integration tests
//!
//! Runs the driver over temp corpora and checks the produced tree: the
//! naming contract, artifact counts, the speed-before-pitch dependency and
//! failure isolation.
//!
//! Run with:
//! ```bash
//! cargo test -p speechaug --test pipeline_integration
//! ```

mod helpers;

use std::fs;

use helpers::*;
use speechaug::prelude::*;
use speechaug::{BranchError, VariantError};

#[test]
fn test_single_recording_produces_contract_names() {
    let corpus = TestCorpus::new();
    corpus.add_recording("spk1", "s01");

    let config = corpus.config(&[0.9, 1.1], &[-100, 100]);
    let summary = Augmenter::new(config).unwrap().run().unwrap();

    assert_eq!(
        file_names(&corpus.subject_output("spk1")),
        default_artifact_names("s01")
    );
    assert_eq!(summary.artifacts_written, 7);
    assert!(!summary.has_failures());
}

#[test]
fn test_artifact_count_matches_formula() {
    let corpus = TestCorpus::new();
    corpus.add_recording("a", "r1");
    corpus.add_recording("a", "r2");
    corpus.add_recording("b", "r3");

    let speeds = [0.8, 1.0, 1.2];
    let pitches = [200];
    let config = corpus.config(&speeds, &pitches);
    let summary = Augmenter::new(config).unwrap().run().unwrap();

    let per_recording = 1 + speeds.len() + speeds.len() * pitches.len();
    assert_eq!(summary.recordings, 3);
    assert_eq!(summary.artifacts_written, 3 * per_recording);
    assert_eq!(file_names(&corpus.subject_output("a")).len(), 2 * per_recording);
    assert_eq!(file_names(&corpus.subject_output("b")).len(), per_recording);
    assert!(corpus
        .subject_output("b")
        .join("r3_speed1.0_pitch+200.wav")
        .is_file());
}

#[test]
fn test_rerun_produces_same_names_and_content() {
    let corpus = TestCorpus::new();
    corpus.add_recording("spk1", "s01");
    let augmenter = Augmenter::new(corpus.config(&[0.9, 1.1], &[-100, 100])).unwrap();

    augmenter.run().unwrap();
    let first_names = file_names(&corpus.subject_output("spk1"));
    let first_bytes: Vec<Vec<u8>> = first_names
        .iter()
        .map(|n| fs::read(corpus.subject_output("spk1").join(n)).unwrap())
        .collect();

    augmenter.run().unwrap();
    let second_names = file_names(&corpus.subject_output("spk1"));
    let second_bytes: Vec<Vec<u8>> = second_names
        .iter()
        .map(|n| fs::read(corpus.subject_output("spk1").join(n)).unwrap())
        .collect();

    assert_eq!(first_names, second_names);
    assert_eq!(first_bytes, second_bytes);
}

#[test]
fn test_injected_pitch_failure_is_isolated() {
    let corpus = TestCorpus::new();
    let source = corpus.add_recording("spk1", "s01");
    corpus.add_recording("spk1", "s02");

    let config = corpus.config(&[0.9, 1.1], &[-100, 100]);
    // 1.1 x 16 kHz = 17.6 kHz
    let effects = FaultyEffects::new(&config).fail_pitch(17600, 100);
    let augmenter = Augmenter::with_effects(config, effects).unwrap();

    let out_dir = corpus.subject_output("spk1");
    fs::create_dir_all(&out_dir).unwrap();
    let report = augmenter.process_recording("spk1", &source, &out_dir).unwrap();

    assert_eq!(report.artifacts.len(), 6);
    assert!(report.branch_failures.is_empty());
    assert_eq!(report.variant_failures.len(), 1);
    let failure = &report.variant_failures[0];
    assert!(matches!(failure, VariantError::PitchShift { .. }));
    assert_eq!(failure.speed().label(), "1.1");
    assert_eq!(failure.cents(), PitchShift::new(100));

    let mut expected = default_artifact_names("s01");
    expected.remove("s01_speed1.1_pitch+100.wav");
    assert_eq!(file_names(&out_dir), expected);
}

#[test]
fn test_pitch_failure_does_not_fail_run() {
    let corpus = TestCorpus::new();
    corpus.add_recording("spk1", "s01");
    corpus.add_recording("spk2", "s01");

    let config = corpus.config(&[0.9, 1.1], &[-100, 100]);
    let effects = FaultyEffects::new(&config).fail_pitch(14400, -100);
    let summary = Augmenter::with_effects(config, effects).unwrap().run().unwrap();

    assert_eq!(summary.recordings, 2);
    assert_eq!(summary.recordings_failed, 0);
    assert_eq!(summary.variants_failed, 2);
    assert_eq!(summary.artifacts_written, 12);
    for subject in ["spk1", "spk2"] {
        let names = file_names(&corpus.subject_output(subject));
        assert!(names.contains("s01_speed0.9.wav"));
        assert!(!names.contains("s01_speed0.9_pitch-100.wav"));
    }
}

#[test]
fn test_unsupported_pitch_shift_fails_per_variant() {
    let corpus = TestCorpus::new();
    corpus.add_recording("spk1", "s01");

    // Beyond the shifter's two octaves, but still a valid configuration.
    let config = corpus.config(&[0.9], &[100, 3600]);
    let summary = Augmenter::new(config).unwrap().run().unwrap();

    assert_eq!(summary.recordings_failed, 0);
    assert_eq!(summary.branches_failed, 0);
    assert_eq!(summary.variants_failed, 1);
    assert_eq!(summary.artifacts_written, 3);
    let names = file_names(&corpus.subject_output("spk1"));
    assert!(names.contains("s01_speed0.9_pitch+100.wav"));
    assert!(!names.contains("s01_speed0.9_pitch+3600.wav"));
}

#[test]
fn test_resample_failure_skips_only_that_branch() {
    let corpus = TestCorpus::new();
    let source = corpus.add_recording("spk1", "s01");

    let config = corpus.config(&[0.9, 1.1], &[-100, 100]);
    let effects = FaultyEffects::new(&config).fail_resample_to(14400);
    let augmenter = Augmenter::with_effects(config, effects).unwrap();

    let out_dir = corpus.subject_output("spk1");
    fs::create_dir_all(&out_dir).unwrap();
    let report = augmenter.process_recording("spk1", &source, &out_dir).unwrap();

    assert_eq!(report.branch_failures.len(), 1);
    assert!(matches!(
        report.branch_failures[0],
        BranchError::Resample { .. }
    ));
    assert_eq!(report.branch_failures[0].speed().label(), "0.9");
    assert!(report.variant_failures.is_empty());

    let names = file_names(&out_dir);
    let expected: std::collections::BTreeSet<String> = [
        "s01_orig.wav",
        "s01_speed1.1.wav",
        "s01_speed1.1_pitch+100.wav",
        "s01_speed1.1_pitch-100.wav",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    assert_eq!(names, expected);
}

#[test]
fn test_no_pitch_artifact_without_its_speed_parent() {
    let corpus = TestCorpus::new();
    corpus.add_recording("spk1", "s01");
    corpus.add_recording("spk1", "s02");

    let config = corpus.config(&[0.9, 1.1], &[-100, 100]);
    let effects = FaultyEffects::new(&config)
        .fail_resample_to(17600)
        .fail_pitch(14400, 100);
    Augmenter::with_effects(config, effects).unwrap().run().unwrap();

    let names = file_names(&corpus.subject_output("spk1"));
    for name in &names {
        if let Some(idx) = name.find("_pitch") {
            let parent = format!("{}.wav", &name[..idx]);
            assert!(names.contains(&parent), "{} has no parent {}", name, parent);
        }
    }
    assert!(!names.iter().any(|n| n.contains("speed1.1")));
}

#[test]
fn test_unreadable_recording_is_isolated() {
    let corpus = TestCorpus::new();
    corpus.add_recording("spk1", "good");
    corpus.add_file("spk1/broken.wav", b"RIFF....this is not a wave file");

    let config = corpus.config(&[0.9], &[100]);
    let summary = Augmenter::new(config).unwrap().run().unwrap();

    assert_eq!(summary.recordings, 2);
    assert_eq!(summary.recordings_failed, 1);
    assert_eq!(summary.artifacts_written, 3);

    let names = file_names(&corpus.subject_output("spk1"));
    assert_eq!(names.len(), 3);
    assert!(names.iter().all(|n| n.starts_with("good_")));
}

#[test]
fn test_non_audio_files_and_root_entries_are_skipped() {
    let corpus = TestCorpus::new();
    corpus.add_recording("spk1", "s01");
    corpus.add_file("spk1/readme.txt", b"notes");
    corpus.add_file("spk1/s01.WAV.bak", b"old");
    corpus.add_file("stray.wav", b"not a subject");
    corpus.add_file("index.csv", b"subject,file");

    let config = corpus.config(&[0.9], &[]);
    let summary = Augmenter::new(config).unwrap().run().unwrap();

    assert_eq!(summary.subjects, 1);
    assert_eq!(summary.recordings, 1);
    let root_entries = file_names(&corpus.output());
    assert_eq!(root_entries.len(), 1);
    assert!(root_entries.contains("spk1"));

    let names = file_names(&corpus.subject_output("spk1"));
    assert_eq!(names.len(), 2);
    assert!(!names.iter().any(|n| n.contains("readme")));
}

#[test]
fn test_empty_subject_is_mirrored() {
    let corpus = TestCorpus::new();
    corpus.add_subject("quiet");
    corpus.add_file("notes_only/readme.txt", b"no audio here");
    corpus.add_recording("spk1", "s01");

    let summary = Augmenter::new(corpus.config(&[0.9, 1.1], &[-100, 100]))
        .unwrap()
        .run()
        .unwrap();

    assert_eq!(summary.subjects, 3);
    for empty in ["quiet", "notes_only"] {
        let dir = corpus.subject_output(empty);
        assert!(dir.is_dir(), "{} not mirrored", empty);
        assert!(file_names(&dir).is_empty());
    }
}

#[test]
fn test_missing_input_is_catastrophic() {
    let corpus = TestCorpus::new();
    let mut config = corpus.config(&[0.9], &[100]);
    config.input_dir = corpus.input().join("does_not_exist");

    let result = Augmenter::new(config).unwrap().run();
    assert!(matches!(result, Err(Error::InputNotFound(_))));
    assert!(!corpus.output().exists());
}

#[test]
fn test_parallel_run_matches_sequential() {
    let sequential = TestCorpus::new();
    let parallel = TestCorpus::new();
    for corpus in [&sequential, &parallel] {
        for subject in ["a", "b"] {
            for stem in ["r1", "r2", "r3"] {
                corpus.add_recording(subject, stem);
            }
        }
    }

    let seq_summary = Augmenter::new(sequential.config(&[0.9, 1.1], &[-100, 100]))
        .unwrap()
        .run()
        .unwrap();

    let mut config = parallel.config(&[0.9, 1.1], &[-100, 100]);
    config.jobs = 4;
    let par_summary = Augmenter::new(config).unwrap().run().unwrap();

    assert_eq!(seq_summary, par_summary);
    for subject in ["a", "b"] {
        let seq_dir = sequential.subject_output(subject);
        let par_dir = parallel.subject_output(subject);
        let names = file_names(&seq_dir);
        assert_eq!(names, file_names(&par_dir));
        for name in &names {
            assert_eq!(
                fs::read(seq_dir.join(name)).unwrap(),
                fs::read(par_dir.join(name)).unwrap(),
                "{} differs",
                name
            );
        }
    }
}

#[test]
fn test_dry_run_lists_planned_paths() {
    let corpus = TestCorpus::new();
    corpus.add_recording("spk1", "s01");
    corpus.add_recording("spk2", "s02");

    let mut config = corpus.config(&[0.9, 1.1], &[-100, 100]);
    config.dry_run = true;
    let augmenter = Augmenter::new(config).unwrap();
    let paths = augmenter.dry_run().unwrap();

    assert_eq!(paths.len(), 14);
    assert_eq!(paths[0], corpus.subject_output("spk1").join("s01_orig.wav"));
    assert_eq!(paths[7], corpus.subject_output("spk2").join("s02_orig.wav"));
    assert!(!corpus.output().exists());
}
