//! Integration tests for Strata

use std::collections::HashMap;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use strata::loader::{
    HostLoader, LoadedUnit, LoaderOptions, NoHost, ResourceUrl, UnitLoader, UnitOrigin,
};
use strata::source::manifest::MANIFEST_ENTRY;
use strata::StrataError;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

fn write_file(root: &Path, rel: &str, content: &[u8]) -> PathBuf {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, content).unwrap();
    path
}

fn write_zip(path: &Path, entries: &[(&str, &[u8])]) -> PathBuf {
    let file = std::fs::File::create(path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    for (name, content) in entries {
        writer.start_file(*name, SimpleFileOptions::default()).unwrap();
        writer.write_all(content).unwrap();
    }
    writer.finish().unwrap();
    path.to_path_buf()
}

fn loader_over(host: Arc<dyn HostLoader>) -> UnitLoader {
    UnitLoader::new(host, LoaderOptions::default())
}

/// Host with a fixed set of units and resources that counts calls
#[derive(Default)]
struct FakeHost {
    units: HashMap<String, Arc<LoadedUnit>>,
    resources: HashMap<String, ResourceUrl>,
    unit_lookups: AtomicUsize,
    links: AtomicUsize,
}

impl FakeHost {
    fn with_unit(mut self, name: &str, bytes: &[u8]) -> Self {
        self.units
            .insert(name.to_string(), Arc::new(LoadedUnit::host(name, bytes.to_vec())));
        self
    }

    fn with_resource(mut self, name: &str, url: &str) -> Self {
        self.resources
            .insert(name.to_string(), ResourceUrl::Host(url.to_string()));
        self
    }
}

impl HostLoader for FakeHost {
    fn load_unit(&self, name: &str) -> Option<Arc<LoadedUnit>> {
        self.unit_lookups.fetch_add(1, Ordering::SeqCst);
        self.units.get(name).cloned()
    }

    fn find_resource(&self, name: &str) -> Option<ResourceUrl> {
        self.resources.get(name).cloned()
    }

    fn find_all_resources(&self, name: &str) -> Vec<ResourceUrl> {
        self.resources.get(name).cloned().into_iter().collect()
    }

    fn link(&self, _unit: &LoadedUnit) {
        self.links.fetch_add(1, Ordering::SeqCst);
    }
}

mod units {
    use super::*;

    #[test]
    fn repeated_loads_return_the_same_instance() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "a/b/Foo.unit", b"foo");
        let loader = loader_over(Arc::new(NoHost));
        loader.register_directory(temp.path()).unwrap();

        let first = loader.load_unit("a.b.Foo").unwrap();
        let second = loader.load_unit("a.b.Foo").unwrap();
        let third = loader.load_unit("a.b.Foo").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(&first, &third));
        assert_eq!(loader.stats().byte_reads, 1);
        assert_eq!(loader.stats().cache_hits, 2);
    }

    #[test]
    fn misses_are_remembered_without_searching_again() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "a/b/Foo.unit", b"foo");
        let host = Arc::new(FakeHost::default());
        let loader = loader_over(host.clone());
        loader.register_directory(temp.path()).unwrap();

        let first = loader.load_unit("a.b.Missing").unwrap_err();
        let second = loader.load_unit("a.b.Missing").unwrap_err();

        match (first, second) {
            (StrataError::UnitNotFound(a), StrataError::UnitNotFound(b)) => {
                assert!(Arc::ptr_eq(&a, &b));
                assert_eq!(a.name, "a.b.Missing");
            }
            other => panic!("unexpected errors: {:?}", other),
        }

        let stats = loader.stats();
        assert_eq!(stats.local_searches, 1);
        assert_eq!(stats.negative_hits, 1);
        assert_eq!(stats.byte_reads, 0);
        assert_eq!(host.unit_lookups.load(Ordering::SeqCst), 1);
        assert_eq!(loader.negative_cache_len(), 1);
    }

    #[test]
    fn clearing_misses_lets_new_sources_answer() {
        let later = TempDir::new().unwrap();
        write_file(later.path(), "a/b/Late.unit", b"late");
        let loader = loader_over(Arc::new(NoHost));

        assert!(loader.load_unit("a.b.Late").unwrap_err().is_not_found());

        loader.register_directory(later.path()).unwrap();
        // still remembered as missing until cleared
        assert!(loader.load_unit("a.b.Late").is_err());

        loader.clear_negative_cache();
        assert_eq!(loader.negative_cache_len(), 0);
        let unit = loader.load_unit("a.b.Late").unwrap();
        assert_eq!(unit.bytes(), b"late");
    }

    #[test]
    fn host_definition_wins_and_local_bytes_are_never_read() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "a/b/Foo.unit", b"local");
        let host = Arc::new(FakeHost::default().with_unit("a.b.Foo", b"sentinel"));
        let sentinel = host.units["a.b.Foo"].clone();
        let loader = loader_over(host.clone());
        loader.register_directory(temp.path()).unwrap();

        let unit = loader.load_unit("a.b.Foo").unwrap();

        assert!(Arc::ptr_eq(&unit, &sentinel));
        assert_eq!(unit.origin(), &UnitOrigin::Host);
        assert_eq!(loader.stats().byte_reads, 0);
        assert_eq!(loader.stats().local_searches, 0);
    }

    #[test]
    fn first_registered_directory_shadows_later_ones() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        write_file(first.path(), "a/b/Foo.unit", b"from-first");
        write_file(second.path(), "a/b/Foo.unit", b"from-second");
        let loader = loader_over(Arc::new(NoHost));

        assert_eq!(loader.register_directory(first.path()).unwrap(), 1);
        assert_eq!(loader.register_directory(second.path()).unwrap(), 0);

        assert_eq!(loader.load_unit("a.b.Foo").unwrap().bytes(), b"from-first");
        let sources = loader.sources();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[1].units, 1);
        assert_eq!(sources[1].indexed, 0);
    }

    #[test]
    fn archives_registered_after_a_directory_are_shadowed() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("dir");
        write_file(&dir, "a/Foo.unit", b"loose");
        let archive = write_zip(&temp.path().join("pkg.zip"), &[("a/Foo.unit", b"archived")]);
        let loader = loader_over(Arc::new(NoHost));

        loader.register_directory(&dir).unwrap();
        assert_eq!(loader.register_archive_path(&archive).unwrap(), 0);

        let sources = loader.sources();
        assert_eq!((sources[1].units, sources[1].indexed), (1, 0));
    }

    #[test]
    fn directories_take_precedence_over_archives() {
        let temp = TempDir::new().unwrap();
        let archive = write_zip(&temp.path().join("pkg.zip"), &[("a/Foo.unit", b"archived")]);
        let dir = temp.path().join("dir");
        write_file(&dir, "a/Foo.unit", b"loose");
        let loader = loader_over(Arc::new(NoHost));

        // archive registered first, directory still wins
        loader.register_archive_path(&archive).unwrap();
        loader.register_directory(&dir).unwrap();

        assert_eq!(loader.load_unit("a.Foo").unwrap().bytes(), b"loose");
    }

    #[test]
    fn concurrent_loads_agree_on_one_instance() {
        const THREADS: usize = 16;
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "a/b/Hot.unit", &[42u8; 4096]);
        let loader = Arc::new(loader_over(Arc::new(NoHost)));
        loader.register_directory(temp.path()).unwrap();
        let barrier = Arc::new(std::sync::Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let loader = loader.clone();
                let barrier = barrier.clone();
                std::thread::spawn(move || {
                    barrier.wait();
                    loader.load_unit("a.b.Hot").unwrap()
                })
            })
            .collect();
        let units: Vec<Arc<LoadedUnit>> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        for unit in &units[1..] {
            assert!(Arc::ptr_eq(unit, &units[0]));
        }
        let reads = loader.stats().byte_reads;
        assert!((1..=THREADS as u64).contains(&reads), "reads = {}", reads);
        assert_eq!(loader.cached_unit_count(), 1);
        assert!(Arc::ptr_eq(&loader.load_unit("a.b.Hot").unwrap(), &units[0]));
    }

    #[test]
    fn bad_sizes_are_skipped_for_the_next_source() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("dir");
        write_file(&dir, "a/Empty.unit", b"");
        write_file(&dir, "a/Big.unit", &[1u8; 128]);
        let archive = write_zip(&temp.path().join("pkg.zip"), &[("a/Empty.unit", b"good")]);

        let options = LoaderOptions {
            max_unit_size: 64,
            ..LoaderOptions::default()
        };
        let loader = UnitLoader::new(Arc::new(NoHost), options);
        // archive first so the directory does not shadow its copy
        loader.register_archive_path(&archive).unwrap();
        loader.register_directory(&dir).unwrap();

        // zero-length file is rejected, the archive copy answers
        assert_eq!(loader.load_unit("a.Empty").unwrap().bytes(), b"good");
        // oversized and nowhere else
        assert!(loader.load_unit("a.Big").unwrap_err().is_not_found());
        assert_eq!(loader.stats().byte_reads, 3);
    }

    #[test]
    fn directory_and_archive_end_to_end() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("classes");
        write_file(&dir, "a/b/Foo.unit", b"foo-bytes");
        let archive = write_zip(
            &temp.path().join("bar.zip"),
            &[
                ("a/b/Bar.unit", b"bar-bytes"),
                (MANIFEST_ENTRY, b"[package]\ntitle = \"Bar Kit\"\nversion = \"3.0\"\n"),
            ],
        );
        let loader = loader_over(Arc::new(NoHost));
        loader.register_directory(&dir).unwrap();
        loader.register_archive_path(&archive).unwrap();

        let foo = loader.load_unit("a.b.Foo").unwrap();
        assert_eq!(foo.bytes(), b"foo-bytes");
        assert!(foo.domain().is_default());
        assert!(matches!(foo.origin(), UnitOrigin::Directory(_)));

        let bar = loader.load_unit("a.b.Bar").unwrap();
        assert_eq!(bar.bytes(), b"bar-bytes");
        assert_eq!(bar.domain().metadata.title.as_deref(), Some("Bar Kit"));
        assert_eq!(bar.domain().metadata.version.as_deref(), Some("3.0"));
        let origin = archive.canonicalize().unwrap().display().to_string();
        assert_eq!(bar.domain().origin.as_deref(), Some(origin.as_str()));

        let searches = loader.stats().local_searches;
        assert!(loader.load_unit("a.b.Baz").unwrap_err().is_not_found());
        assert!(loader.load_unit("a.b.Baz").unwrap_err().is_not_found());
        assert_eq!(loader.stats().local_searches, searches + 1);
    }

    #[test]
    fn units_from_one_archive_share_a_domain() {
        let temp = TempDir::new().unwrap();
        let archive = write_zip(
            &temp.path().join("kit.zip"),
            &[("k/One.unit", b"1"), ("k/Two.unit", b"2")],
        );
        let loader = loader_over(Arc::new(NoHost));
        loader.register_archive_path(&archive).unwrap();

        let one = loader.load_unit("k.One").unwrap();
        let two = loader.load_unit("k.Two").unwrap();
        assert!(Arc::ptr_eq(one.domain(), two.domain()));
    }

    #[test]
    fn probe_names_are_not_remembered() {
        let loader = loader_over(Arc::new(NoHost));

        assert!(loader.load_unit("a.b.Foo$1").is_err());
        assert!(loader.load_unit("a.b.Foo$1").is_err());
        assert!(loader.load_unit("a.b.FooBeanInfo").is_err());

        assert_eq!(loader.stats().local_searches, 3);
        assert_eq!(loader.negative_cache_len(), 0);
    }

    #[test]
    fn disabled_negative_cache_searches_every_time() {
        let options = LoaderOptions {
            negative_cache: false,
            ..LoaderOptions::default()
        };
        let loader = UnitLoader::new(Arc::new(NoHost), options);

        assert!(loader.load_unit("a.Gone").is_err());
        assert!(loader.load_unit("a.Gone").is_err());
        assert_eq!(loader.stats().local_searches, 2);
        assert_eq!(loader.negative_cache_len(), 0);
    }

    #[test]
    fn find_unit_maps_absence_to_none() {
        let loader = loader_over(Arc::new(NoHost));
        assert!(loader.find_unit("a.Gone").unwrap().is_none());
    }

    #[test]
    fn resolve_flag_asks_host_to_link() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "a/Foo.unit", b"foo");
        let host = Arc::new(FakeHost::default());
        let loader = loader_over(host.clone());
        loader.register_directory(temp.path()).unwrap();

        loader.load_unit("a.Foo").unwrap();
        assert_eq!(host.links.load(Ordering::SeqCst), 0);
        loader.load_unit_with("a.Foo", true).unwrap();
        assert_eq!(host.links.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn archive_entries_for_cached_units_are_shadowed() {
        let temp = TempDir::new().unwrap();
        let archive = write_zip(&temp.path().join("dup.zip"), &[("x/Y.unit", b"archived")]);
        let host = Arc::new(FakeHost::default().with_unit("x.Y", b"host"));
        let loader = loader_over(host);

        loader.load_unit("x.Y").unwrap();
        assert_eq!(loader.register_archive_path(&archive).unwrap(), 0);
        assert!(!loader.is_indexed("x.Y"));
    }

    #[test]
    fn preloading_twice_is_a_duplicate_definition() {
        let loader = loader_over(Arc::new(NoHost));
        loader.preload(LoadedUnit::host("p.Q", b"1".to_vec())).unwrap();

        let err = loader
            .preload(LoadedUnit::host("p.Q", b"2".to_vec()))
            .unwrap_err();
        assert!(matches!(err, StrataError::DuplicateDefinition(_)));
        assert_eq!(loader.load_unit("p.Q").unwrap().bytes(), b"1");
    }

    #[test]
    fn chained_loaders_share_parent_instances() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "base/Core.unit", b"core");
        let parent = Arc::new(loader_over(Arc::new(NoHost)));
        parent.register_directory(temp.path()).unwrap();
        let child = loader_over(parent.clone());

        let from_child = child.load_unit("base.Core").unwrap();
        let from_parent = parent.load_unit("base.Core").unwrap();
        assert!(Arc::ptr_eq(&from_child, &from_parent));
    }

    #[test]
    fn missing_directory_is_invalid_source() {
        let temp = TempDir::new().unwrap();
        let loader = loader_over(Arc::new(NoHost));
        let err = loader
            .register_directory(&temp.path().join("absent"))
            .unwrap_err();
        assert!(matches!(err, StrataError::InvalidSource { .. }));
        assert!(loader.sources().is_empty());
    }

    #[test]
    fn archive_from_memory_handle() {
        let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
        writer
            .start_file("m/Mem.unit", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"in-memory").unwrap();
        let cursor = writer.finish().unwrap();

        let loader = loader_over(Arc::new(NoHost));
        assert_eq!(loader.register_archive(cursor, "mem:bundle").unwrap(), 1);
        let unit = loader.load_unit("m.Mem").unwrap();
        assert_eq!(unit.origin(), &UnitOrigin::Archive("mem:bundle".to_string()));
    }
}

mod resources {
    use super::*;

    #[test]
    fn local_resources_override_the_host() {
        let temp = TempDir::new().unwrap();
        let local = write_file(temp.path(), "conf/app.toml", b"local = true");
        let host = Arc::new(FakeHost::default().with_resource("conf/app.toml", "host:app"));
        let loader = loader_over(host);
        loader.register_directory(temp.path()).unwrap();

        assert_eq!(
            loader.find_resource("conf/app.toml"),
            Some(ResourceUrl::File(local.canonicalize().unwrap()))
        );
    }

    #[test]
    fn host_answers_when_nothing_local_matches() {
        let host = Arc::new(FakeHost::default().with_resource("only/host.txt", "host:x"));
        let loader = loader_over(host);
        assert_eq!(
            loader.find_resource("/only/host.txt"),
            Some(ResourceUrl::Host("host:x".to_string()))
        );
        assert_eq!(loader.find_resource("nowhere.txt"), None);
    }

    #[test]
    fn find_all_lists_every_source_in_order() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("dir");
        write_file(&dir, "conf/app.toml", b"dir");
        let archive = write_zip(&temp.path().join("pkg.zip"), &[("conf/app.toml", b"zip")]);
        let host = Arc::new(FakeHost::default().with_resource("conf/app.toml", "host:app"));
        let loader = loader_over(host);
        loader.register_archive_path(&archive).unwrap();
        loader.register_directory(&dir).unwrap();

        let all = loader.find_all_resources("conf/app.toml");
        assert_eq!(all.len(), 3);
        assert!(matches!(all[0], ResourceUrl::File(_)));
        assert!(matches!(all[1], ResourceUrl::Archive { .. }));
        assert_eq!(all[2], ResourceUrl::Host("host:app".to_string()));
    }

    #[test]
    fn resource_misses_recover_after_clear() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "late.txt", b"late");
        let loader = loader_over(Arc::new(NoHost));

        assert_eq!(loader.find_resource("late.txt"), None);
        assert!(loader.find_all_resources("late.txt").is_empty());
        loader.register_directory(temp.path()).unwrap();
        assert_eq!(loader.find_resource("late.txt"), None);

        loader.clear_negative_cache();
        assert!(loader.find_resource("late.txt").is_some());
        assert_eq!(loader.find_all_resources("late.txt").len(), 1);
    }

    #[test]
    fn streams_directory_and_archive_resources() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("dir");
        write_file(&dir, "notes/a.txt", b"from dir");
        let archive = write_zip(&temp.path().join("pkg.zip"), &[("notes/b.txt", b"from zip")]);
        let loader = loader_over(Arc::new(NoHost));
        loader.register_directory(&dir).unwrap();
        loader.register_archive_path(&archive).unwrap();

        let mut content = String::new();
        loader
            .open_resource_stream("notes/a.txt")
            .unwrap()
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "from dir");

        content.clear();
        loader
            .open_resource_stream("notes/b.txt")
            .unwrap()
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "from zip");

        assert!(loader.open_resource_stream("notes/c.txt").unwrap().is_none());
    }

    #[test]
    fn empty_and_oversized_archive_resources_open() {
        let temp = TempDir::new().unwrap();
        let big = vec![3u8; 100];
        let archive = write_zip(
            &temp.path().join("res.zip"),
            &[("conf/empty.properties", b""), ("data.bin", &big)],
        );
        let options = LoaderOptions {
            max_unit_size: 64,
            ..LoaderOptions::default()
        };
        let loader = UnitLoader::new(Arc::new(NoHost), options);
        loader.register_archive_path(&archive).unwrap();

        let mut content = Vec::new();
        loader
            .open_resource_stream("conf/empty.properties")
            .unwrap()
            .unwrap()
            .read_to_end(&mut content)
            .unwrap();
        assert!(content.is_empty());

        loader
            .open_resource_stream("data.bin")
            .unwrap()
            .unwrap()
            .read_to_end(&mut content)
            .unwrap();
        assert_eq!(content, big);
    }

    #[test]
    fn child_streams_parent_archive_resources() {
        let temp = TempDir::new().unwrap();
        let archive = write_zip(&temp.path().join("pkg.zip"), &[("shared.txt", b"shared")]);
        let parent = Arc::new(loader_over(Arc::new(NoHost)));
        parent.register_archive_path(&archive).unwrap();
        let child = loader_over(parent);

        let mut content = String::new();
        child
            .open_resource_stream("shared.txt")
            .unwrap()
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "shared");
    }
}

mod cli_tests {
    use super::*;
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;

    /// Command isolated from any user configuration
    fn strata(config_dir: &TempDir) -> Command {
        let mut cmd = cargo_bin_cmd!("strata");
        cmd.env("STRATA_CONFIG", config_dir.path().join("config.toml"));
        cmd
    }

    #[test]
    fn help_displays() {
        let temp = TempDir::new().unwrap();
        strata(&temp)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("code-unit loader"));
    }

    #[test]
    fn version_displays() {
        let temp = TempDir::new().unwrap();
        strata(&temp)
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("strata"));
    }

    #[test]
    fn load_from_directory() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("units");
        write_file(&dir, "a/b/Foo.unit", b"foo");

        strata(&temp)
            .args(["load", "a.b.Foo", "--format", "plain", "--dir"])
            .arg(&dir)
            .assert()
            .success()
            .stdout(predicate::str::contains("a.b.Foo\tdir:"));
    }

    #[test]
    fn load_missing_unit_fails() {
        let temp = TempDir::new().unwrap();
        strata(&temp)
            .args(["load", "a.b.Nope"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unit not found: a.b.Nope"));
    }

    #[test]
    fn load_json_reports_package() {
        let temp = TempDir::new().unwrap();
        let archive = write_zip(
            &temp.path().join("kit.zip"),
            &[
                ("k/One.unit", b"1"),
                (MANIFEST_ENTRY, b"[package]\ntitle = \"Kit\"\n"),
            ],
        );

        strata(&temp)
            .args(["load", "k.One", "--format", "json", "--archive"])
            .arg(&archive)
            .assert()
            .success()
            .stdout(predicate::str::contains("\"title\": \"Kit\""));
    }

    #[test]
    fn sources_lists_registered() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("units");
        write_file(&dir, "a/Foo.unit", b"foo");

        strata(&temp)
            .args(["sources", "--format", "json", "--dir"])
            .arg(&dir)
            .assert()
            .success()
            .stdout(predicate::str::contains("\"kind\": \"directory\""));
    }

    #[test]
    fn sources_empty() {
        let temp = TempDir::new().unwrap();
        strata(&temp)
            .args(["sources", "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[]"));
    }

    #[test]
    fn resource_cat_streams_content() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("res");
        write_file(&dir, "conf/app.toml", b"answer = 42");

        strata(&temp)
            .args(["resource", "conf/app.toml", "--cat", "--dir"])
            .arg(&dir)
            .assert()
            .success()
            .stdout(predicate::str::diff("answer = 42"));
    }

    #[test]
    fn resource_missing_fails() {
        let temp = TempDir::new().unwrap();
        strata(&temp)
            .args(["resource", "none.txt"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Resource not found"));
    }

    #[test]
    fn invalid_dir_reports_hint() {
        let temp = TempDir::new().unwrap();
        strata(&temp)
            .args(["sources", "--dir"])
            .arg(temp.path().join("absent"))
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid source"))
            .stderr(predicate::str::contains("Hint:"));
    }

    #[test]
    fn config_path() {
        let temp = TempDir::new().unwrap();
        strata(&temp)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let temp = TempDir::new().unwrap();
        strata(&temp)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[loader]"));
    }

    #[test]
    fn config_init_writes_file() {
        let temp = TempDir::new().unwrap();
        strata(&temp).args(["config", "init"]).assert().success();
        assert!(temp.path().join("config.toml").exists());
    }

    #[test]
    fn configured_sources_are_registered() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("units");
        write_file(&dir, "c/Conf.unit", b"conf");
        let config = format!(
            "[sources]\ndirectories = [{:?}]\n",
            dir.display().to_string()
        );
        std::fs::write(temp.path().join("config.toml"), config).unwrap();

        strata(&temp)
            .args(["load", "c.Conf", "--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::contains("c.Conf"));
    }
}
