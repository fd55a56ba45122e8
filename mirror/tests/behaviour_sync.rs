//! Behaviour tests for incremental catalog mirroring.

use camino::{Utf8Path, Utf8PathBuf};
use modpack_mirror::config::MirrorConfig;
use modpack_mirror::engine::RunStatistics;
use modpack_mirror::error::MirrorError;
use modpack_mirror::output::Reporter;
use modpack_mirror::pipeline::run_mirror;
use modpack_mirror::test_utils::{StubTransport, md5_hex};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempDir;

const BASE_URL: &str = "http://mirror.test/";

struct MirrorWorld {
    _temp_dir: TempDir,
    root: Utf8PathBuf,
    config: MirrorConfig,
    transport: StubTransport,
    listed: Vec<String>,
    stats: Option<RunStatistics>,
    error: Option<MirrorError>,
    output: String,
}

impl MirrorWorld {
    fn target(&self) -> &Utf8Path {
        &self.config.target_dir
    }

    fn url(name: &str) -> String {
        format!("{BASE_URL}{name}")
    }

    fn serve_listing(&self) {
        let anchors: String = self
            .listed
            .iter()
            .map(|name| format!("<a href=\"{name}\">{name}</a>\n"))
            .collect();
        self.transport.serve(
            BASE_URL,
            format!("<html><body><h1>Index of /</h1>\n{anchors}</body></html>"),
        );
    }

    fn run(&mut self) {
        let mut output = Vec::new();
        let result = {
            let mut reporter = Reporter::new(&mut output, false);
            run_mirror(&self.config, &self.transport, &mut reporter)
        };
        self.output = String::from_utf8(output).expect("UTF-8 output");
        match result {
            Ok(stats) => {
                self.stats = Some(stats);
                self.error = None;
            }
            Err(err) => {
                self.stats = None;
                self.error = Some(err);
            }
        }
    }
}

#[fixture]
fn world() -> MirrorWorld {
    let temp_dir = tempfile::tempdir().expect("temp dir");
    let root = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).expect("UTF-8 path");
    let config = MirrorConfig {
        base_url: BASE_URL.to_owned(),
        target_dir: root.join("resource_pack"),
        artifact_prefix: "Modpack".to_owned(),
        ..MirrorConfig::default()
    };
    MirrorWorld {
        _temp_dir: temp_dir,
        root,
        config,
        transport: StubTransport::new(),
        listed: Vec::new(),
        stats: None,
        error: None,
        output: String::new(),
    }
}

#[given("an empty mirror directory")]
fn given_empty_directory(world: &mut MirrorWorld) {
    assert!(!world.target().exists(), "target should start absent");
}

#[given("the catalog lists \"{filename}\"")]
fn given_catalog_lists(world: &mut MirrorWorld, filename: String) {
    world.listed.push(filename);
    world.serve_listing();
}

#[given("the server publishes \"{filename}\" with content \"{content}\" at \"{sidecar}\"")]
fn given_published(world: &mut MirrorWorld, filename: String, content: String, sidecar: String) {
    world
        .transport
        .serve(&MirrorWorld::url(&filename), content.clone().into_bytes());
    world
        .transport
        .serve(&MirrorWorld::url(&sidecar), md5_hex(content.as_bytes()));
}

#[given(
    "the server publishes \"{filename}\" with empty content and digest \"{digest}\" at \"{sidecar}\""
)]
fn given_published_empty(world: &mut MirrorWorld, filename: String, digest: String, sidecar: String) {
    world
        .transport
        .serve(&MirrorWorld::url(&filename), Vec::new());
    world.transport.serve(&MirrorWorld::url(&sidecar), digest);
}

#[given("the server serves \"{filename}\" with content \"{content}\"")]
fn given_artifact_only(world: &mut MirrorWorld, filename: String, content: String) {
    world
        .transport
        .serve(&MirrorWorld::url(&filename), content.into_bytes());
}

#[given("the sidecar \"{sidecar}\" is published as \"{text}\"")]
fn given_sidecar_text(world: &mut MirrorWorld, sidecar: String, text: String) {
    world.transport.serve(&MirrorWorld::url(&sidecar), text);
}

#[given("the mirror has run once")]
fn given_previous_run(world: &mut MirrorWorld) {
    world.run();
    assert!(world.error.is_none(), "initial run failed: {:?}", world.error);
}

#[given("the local file \"{filename}\" is deleted")]
fn given_local_deleted(world: &mut MirrorWorld, filename: String) {
    std::fs::remove_file(world.target().join(filename)).expect("remove local file");
}

#[given("the local file \"{filename}\" is overwritten with \"{content}\"")]
fn given_local_overwritten(world: &mut MirrorWorld, filename: String, content: String) {
    std::fs::write(world.target().join(filename), content).expect("overwrite local file");
}

#[given("the target directory is blocked by a file")]
fn given_blocked_target(world: &mut MirrorWorld) {
    let blocker = world.root.join("blocker");
    std::fs::write(&blocker, b"not a directory").expect("write blocker");
    world.config.target_dir = blocker.join("resource_pack");
}

#[when("the mirror runs")]
fn when_mirror_runs(world: &mut MirrorWorld) {
    world.run();
}

#[then(
    "the run reports {total:u64} total, {downloaded:u64} downloaded, {skipped:u64} skipped and {failed:u64} failed"
)]
fn then_run_reports(
    world: &mut MirrorWorld,
    total: u64,
    downloaded: u64,
    skipped: u64,
    failed: u64,
) {
    let stats = world.stats.as_ref().expect("run completed");
    assert_eq!(
        (
            stats.total(),
            stats.downloaded(),
            stats.skipped(),
            stats.failed()
        ),
        (total, downloaded, skipped, failed),
        "output was:\n{}",
        world.output
    );
}

#[then("the local file \"{filename}\" is empty")]
fn then_local_empty(world: &mut MirrorWorld, filename: String) {
    let bytes = std::fs::read(world.target().join(filename)).expect("read local file");
    assert!(bytes.is_empty());
}

#[then("the local file \"{filename}\" contains \"{content}\"")]
fn then_local_contains(world: &mut MirrorWorld, filename: String, content: String) {
    let text = std::fs::read_to_string(world.target().join(filename)).expect("read local file");
    assert_eq!(text, content);
}

#[then("the local file \"{filename}\" does not exist")]
fn then_local_absent(world: &mut MirrorWorld, filename: String) {
    assert!(!world.target().join(filename).exists());
}

#[then("the sidecar \"{sidecar}\" holds \"{digest}\"")]
fn then_sidecar_holds(world: &mut MirrorWorld, sidecar: String, digest: String) {
    let text = std::fs::read_to_string(world.target().join(sidecar)).expect("read sidecar");
    assert_eq!(text, digest);
}

#[then("the sidecar \"{sidecar}\" describes \"{content}\"")]
fn then_sidecar_describes(world: &mut MirrorWorld, sidecar: String, content: String) {
    let text = std::fs::read_to_string(world.target().join(sidecar)).expect("read sidecar");
    assert_eq!(text, md5_hex(content.as_bytes()));
}

#[then("the sidecar \"{sidecar}\" does not exist")]
fn then_sidecar_absent(world: &mut MirrorWorld, sidecar: String) {
    assert!(!world.target().join(sidecar).exists());
}

#[then("the output mentions \"{fragment}\"")]
fn then_output_mentions(world: &mut MirrorWorld, fragment: String) {
    assert!(
        world.output.contains(&fragment),
        "expected output to mention '{fragment}', got:\n{}",
        world.output
    );
}

#[then("the request count for \"{name}\" is {count:usize}")]
fn then_request_count(world: &mut MirrorWorld, name: String, count: usize) {
    assert_eq!(world.transport.request_count(&MirrorWorld::url(&name)), count);
}

#[then("the run fails with a target directory error")]
fn then_target_error(world: &mut MirrorWorld) {
    assert!(
        matches!(world.error, Some(MirrorError::TargetDirectory(_))),
        "expected a target directory error, got {:?}",
        world.error
    );
}

#[scenario(
    path = "tests/features/sync.feature",
    name = "First download writes the archive and its sidecar"
)]
fn scenario_first_download(world: MirrorWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/sync.feature",
    name = "A second run against an unchanged catalog skips everything"
)]
fn scenario_idempotent_rerun(world: MirrorWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/sync.feature",
    name = "A changed remote digest re-downloads only that archive"
)]
fn scenario_change_detection(world: MirrorWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/sync.feature",
    name = "A deleted local archive is downloaded again"
)]
fn scenario_missing_local_recovery(world: MirrorWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/sync.feature",
    name = "A corrupt local archive is replaced"
)]
fn scenario_corruption_rejection(world: MirrorWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/sync.feature",
    name = "An unrecognised filename fails without stopping the run"
)]
fn scenario_malformed_name(world: MirrorWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/sync.feature",
    name = "A malformed remote digest marks the archive as failed"
)]
fn scenario_malformed_digest(world: MirrorWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/sync.feature",
    name = "A transfer that does not match its digest is removed"
)]
fn scenario_corrupt_transfer(world: MirrorWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/sync.feature",
    name = "A missing sidecar fails after every attempt"
)]
fn scenario_missing_sidecar(world: MirrorWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/sync.feature",
    name = "An unwritable target directory aborts the run"
)]
fn scenario_unwritable_target(world: MirrorWorld) {
    let _ = world;
}
