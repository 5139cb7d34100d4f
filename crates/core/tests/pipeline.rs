mod common;

use common::{FakeHinter, FakeToolkit, Project, STAT, static_font, variable_font};
use fontmill_core::{
    Builder, ConfigError, Error, FontBuild, FontConfig, Format, parse_version,
};
use fontmill_font_ops::{
    NameTable,
    cff::{CFF, CffEditor, TopDictString},
    has_table,
    testing::{TestFont, layout_table},
    tables::{DSIG, META},
};
use pretty_assertions::assert_eq;
use read_fonts::{FontRef, TableProvider, types::Tag};
use serde_yaml::Mapping;

const GDEF: Tag = Tag::new(b"GDEF");
const GSUB: Tag = Tag::new(b"GSUB");
const GPOS: Tag = Tag::new(b"GPOS");
const FVAR: Tag = Tag::new(b"fvar");

fn read(path: &std::path::Path) -> Vec<u8> {
    std::fs::read(path).unwrap()
}

fn name(data: &[u8], name_id: u16) -> Option<String> {
    NameTable::from_data(data)
        .unwrap()
        .get(name_id)
        .map(str::to_string)
}

fn resolve(project: &Project, font: &str, yaml: &str) -> FontConfig {
    let settings: Mapping = serde_yaml::from_str(yaml).unwrap();
    FontConfig::resolve(font, &settings, &project.dir.path().join("project.yaml")).unwrap()
}

#[test]
fn test_static_font_end_to_end() {
    let project = Project::new();
    let path = project.descriptor(
        "formats: [ttf]\nfonts:\n  Foo-Bold:\n    source: Foo.ufo\n    names:\n      5: Version 1.23\n      6: Foo-Bold\n",
    );
    let toolkit = FakeToolkit::new(static_font("Foo-Bold"));
    let hinter = FakeHinter::default();

    let report = Builder::load(&path).unwrap().build(&toolkit, &hinter).unwrap();

    let expected = project.output("Foo/TTF/Foo-Bold.ttf");
    assert_eq!(report.artifacts, vec![expected.clone()]);
    assert!(report.is_success());
    assert_eq!(toolkit.calls(), vec!["compile ttf features=true"]);
    assert_eq!(*hinter.calls.borrow(), vec!["ttfautohint"]);

    let data = read(&expected);
    assert_eq!(name(&data, 5).as_deref(), Some("Version 1.23"));
    assert_eq!(name(&data, 3).as_deref(), Some("1.23:NONE:Foo-Bold"));
    let font = FontRef::new(&data).unwrap();
    let revision = font.head().unwrap().font_revision().to_f64();
    assert!((revision - 1.23).abs() < 1e-4);
}

#[test]
fn test_static_tables_and_web_formats() {
    let project = Project::new();
    let path = project.descriptor(
        "fonts:\n  Foo-Regular:\n    source: Foo.ufo\n    formats: [otf, woff, woff2]\n    DSIG: dummy\n    meta:\n      dlng: [Latn, Cyrl]\n",
    );
    let toolkit = FakeToolkit::new(TestFont::new("Foo-Regular").with_cff().build());
    let hinter = FakeHinter::default();

    let report = Builder::load(&path).unwrap().build(&toolkit, &hinter).unwrap();

    assert_eq!(
        report.artifacts,
        vec![
            project.output("Foo/OTFWOFF/Foo-Regular.woff"),
            project.output("Foo/OTFWOFF2/Foo-Regular.woff2"),
            project.output("Foo/OTF/Foo-Regular.otf"),
        ]
    );
    assert_eq!(toolkit.calls(), vec!["compile otf features=true", "optimize"]);
    assert_eq!(*hinter.calls.borrow(), vec!["otfautohint"]);

    let otf = read(&project.output("Foo/OTF/Foo-Regular.otf"));
    assert!(has_table(&otf, DSIG).unwrap());
    assert!(has_table(&otf, META).unwrap());
    assert_eq!(&read(&project.output("Foo/OTFWOFF/Foo-Regular.woff"))[..4], b"wOFF");
    assert_eq!(&read(&project.output("Foo/OTFWOFF2/Foo-Regular.woff2"))[..4], b"wOF2");
}

#[test]
fn test_subsets_run_under_their_own_identity() {
    let project = Project::new();
    project.file("latin.txt", "# latn, cyrl\nA\n");
    let path = project.descriptor(
        "fonts:\n  Foo-Regular:\n    source: Foo.ufo\n    formats: [ttf, woff2]\n    names:\n      1: Foo\n    subsets:\n      Foo-Latin:\n        glyphlist: latin.txt\n        names:\n          1: Foo Latin\n",
    );
    let toolkit = FakeToolkit::new(static_font("Foo-Regular"));
    let hinter = FakeHinter::default();

    let report = Builder::load(&path).unwrap().build(&toolkit, &hinter).unwrap();

    assert_eq!(
        report.artifacts,
        vec![
            project.output("Foo/TTFWOFF2/Foo-Latin.woff2"),
            project.output("Foo/TTF/Foo-Latin.ttf"),
            project.output("Foo/TTFWOFF2/Foo-Regular.woff2"),
            project.output("Foo/TTF/Foo-Regular.ttf"),
        ]
    );
    assert_eq!(
        toolkit.calls(),
        vec!["compile ttf features=true", "subset 1 glyphs, scripts cyrl,latn"]
    );
    let subset = read(&project.output("Foo/TTF/Foo-Latin.ttf"));
    assert_eq!(name(&subset, 1).as_deref(), Some("Foo Latin"));
    let parent = read(&project.output("Foo/TTF/Foo-Regular.ttf"));
    assert_eq!(name(&parent, 1).as_deref(), Some("Foo"));
}

#[test]
fn test_identity_is_restored_after_failed_subset() {
    let project = Project::new();
    project.file("latin.txt", "A\n");
    let config = resolve(
        &project,
        "Foo-Regular",
        "source: Foo.ufo\nformats: [ttf]\nsubsets:\n  Foo-Latin:\n    glyphlist: latin.txt\n    names: {1: Foo Latin}\n",
    );
    let toolkit = FakeToolkit::new(static_font("Foo-Regular")).failing_subset();
    let hinter = FakeHinter::default();
    let mut build = FontBuild::new(&config, &toolkit, &hinter);
    let before = build.identity.clone();

    let error = build.build().unwrap_err();

    assert!(matches!(
        error,
        Error::Toolkit {
            operation: "subsetting",
            ..
        }
    ));
    assert_eq!(build.identity, before);
    assert!(build.artifacts().is_empty());
}

#[test]
fn test_nested_scopes_restore_in_reverse_order() {
    let project = Project::new();
    let config = resolve(&project, "Foo", "source: Foo.designspace\nformats: [ttf]\n");
    let toolkit = FakeToolkit::new(Vec::new());
    let hinter = FakeHinter::default();
    let mut build = FontBuild::new(&config, &toolkit, &hinter);
    let before = build.identity.clone();
    assert!(before.variable);

    {
        let mut subset = build.scope();
        subset.identity.name = "Foo-Latin".to_string();
        {
            let mut instance = subset.scope();
            instance.identity.name = "Foo-Bold".to_string();
            instance.identity.variable = false;
            instance.identity.stat = None;
            assert_eq!(
                instance.output_path(None),
                project.output("Foo/TTF/Foo-Bold.ttf")
            );
            assert_eq!(
                instance.output_path(Some(Format::Woff2)),
                project.output("Foo/TTFWOFF2/Foo-Bold.woff2")
            );
        }
        assert_eq!(subset.identity.name, "Foo-Latin");
        assert!(subset.identity.variable);
        assert_eq!(
            subset.output_path(None),
            project.output("Foo/TTFVF/Foo-Latin.ttf")
        );
    }
    assert_eq!(build.identity, before);
}

#[test]
fn test_variable_font_with_all_instances() {
    let project = Project::new();
    let path = project.descriptor(
        "fonts:\n  Foo:\n    source: Foo.designspace\n    formats: [ttf, woff]\n    instances: all\n    vf-suffix: VF\n    DSIG: dummy\n",
    );
    let toolkit = FakeToolkit::new(static_font("Foo-Light")).with_variable(variable_font());
    let hinter = FakeHinter::default();

    let builder = Builder::load(&path).unwrap();
    assert_eq!(
        builder.fonts()[0].masters,
        vec![
            project.dir.path().join("Foo-Light.ufo"),
            project.dir.path().join("Foo-Bold.ufo"),
        ]
    );
    let report = builder.build(&toolkit, &hinter).unwrap();

    assert_eq!(
        report.artifacts,
        vec![
            project.output("Foo/TTF/Foo-Light.ttf"),
            project.output("Foo/TTFWOFF/Foo-Light.woff"),
            project.output("Foo/TTF/Foo-SemiBold.ttf"),
            project.output("Foo/TTFWOFF/Foo-SemiBold.woff"),
            project.output("Foo/TTF/Foo-Bold.ttf"),
            project.output("Foo/TTFWOFF/Foo-Bold.woff"),
            project.output("Foo/TTFVFWOFF/Foo.woff"),
            project.output("Foo/TTFVF/Foo.ttf"),
        ]
    );
    assert_eq!(
        toolkit.calls(),
        vec![
            "compile_interpolatable ttf 2",
            "merge ttf Foo-Light,Foo-Bold",
            "default stat",
            "update instance names",
            "instantiate wght=300",
            "update instance names",
            "instantiate wght=600",
            "update instance names",
            "instantiate wght=700",
        ]
    );
    assert!(hinter.calls.borrow().is_empty());

    let vf = read(&project.output("Foo/TTFVF/Foo.ttf"));
    assert!(has_table(&vf, STAT).unwrap());
    assert_eq!(name(&vf, 1).as_deref(), Some("Foo VF"));
    assert_eq!(name(&vf, 16).as_deref(), Some("Foo VF"));
    assert_eq!(name(&vf, 6).as_deref(), Some("FooVF-Light"));

    let bold = read(&project.output("Foo/TTF/Foo-Bold.ttf"));
    assert!(!has_table(&bold, FVAR).unwrap());
    assert!(!has_table(&bold, STAT).unwrap());
    assert!(has_table(&bold, DSIG).unwrap());
    assert_eq!(name(&bold, 1).as_deref(), Some("Foo"));
}

#[test]
fn test_named_instances() {
    let project = Project::new();
    let config = resolve(
        &project,
        "Foo",
        "source: Foo.designspace\nformats: [ttf]\ninstances:\n  Foo-SemiBold:\n  Foo-Heavy:\n    coordinates: {wght: 650}\n    names: {2: Heavy}\n",
    );
    let toolkit = FakeToolkit::new(static_font("Foo-Light")).with_variable(variable_font());
    let hinter = FakeHinter::default();

    let artifacts = FontBuild::new(&config, &toolkit, &hinter).build().unwrap();

    assert_eq!(
        artifacts,
        vec![
            project.output("Foo/TTF/Foo-SemiBold.ttf"),
            project.output("Foo/TTF/Foo-Heavy.ttf"),
            project.output("Foo/TTFVF/Foo.ttf"),
        ]
    );
    let calls = toolkit.calls();
    assert!(calls.contains(&"instantiate wght=600".to_string()));
    assert!(calls.contains(&"instantiate wght=650".to_string()));
    let heavy = read(&project.output("Foo/TTF/Foo-Heavy.ttf"));
    assert_eq!(name(&heavy, 2).as_deref(), Some("Heavy"));
}

#[test]
fn test_unmatched_instance_is_a_configuration_error() {
    let project = Project::new();
    let config = resolve(
        &project,
        "Foo",
        "source: Foo.designspace\nformats: [ttf]\ninstances:\n  Foo-Black:\n",
    );
    let toolkit = FakeToolkit::new(static_font("Foo-Light")).with_variable(variable_font());
    let hinter = FakeHinter::default();

    let error = FontBuild::new(&config, &toolkit, &hinter).build().unwrap_err();

    match error {
        Error::Config(ConfigError::UnmatchedInstance { key, .. }) => assert_eq!(key, "Foo-Black"),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_variable_donor_tables_are_copied_per_master() {
    let project = Project::new();
    let donor = TestFont::new("Foo-Light")
        .with_table(GSUB, layout_table(&["liga"], &[]))
        .build();
    std::fs::write(project.dir.path().join("Foo-Light.ttf"), &donor).unwrap();
    std::fs::write(project.dir.path().join("Foo-Bold.ttf"), &donor).unwrap();
    let config = resolve(
        &project,
        "Foo",
        "source: Foo.designspace\nformats: [ttf]\ndonor:\n  source: [Foo-Light.ttf, Foo-Bold.ttf]\n  tables: [GSUB]\n",
    );
    let toolkit = FakeToolkit::new(static_font("Foo-Light")).with_variable(variable_font());
    let hinter = FakeHinter::default();

    FontBuild::new(&config, &toolkit, &hinter).build().unwrap();

    let merged = toolkit.merged.borrow();
    assert_eq!(merged.len(), 2);
    assert!(merged.iter().all(|m| has_table(&m.data, GSUB).unwrap()));
}

#[test]
fn test_donor_source_rules_for_variable_fonts() {
    let project = Project::new();
    let path = project.descriptor(
        "fonts:\n  Foo:\n    source: Foo.designspace\n    ttf:\n      source: [Foo-Light.ttf]\n      tables: [GSUB]\n",
    );
    match Builder::load(&path) {
        Err(Error::Config(ConfigError::DonorCountMismatch { donors, masters, .. })) => {
            assert_eq!((donors, masters), (1, 2));
        }
        other => panic!("unexpected {other:?}"),
    }

    let path = project.descriptor(
        "fonts:\n  Foo:\n    source: Foo.designspace\n    ttf:\n      source: Foo-Light.ttf\n",
    );
    assert!(matches!(
        Builder::load(&path),
        Err(Error::Config(ConfigError::DonorSourceNotList { .. }))
    ));
}

#[test]
fn test_static_donor_replacing_layout() {
    let project = Project::new();
    let donor = TestFont::new("Foo-Regular")
        .with_table(GDEF, vec![0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0])
        .with_table(GSUB, layout_table(&["liga"], &[]))
        .with_table(GPOS, layout_table(&["kern"], &[]))
        .build();
    std::fs::write(project.dir.path().join("Foo-Donor.ttf"), &donor).unwrap();
    let path = project.descriptor(
        "fonts:\n  Foo-Regular:\n    source: Foo.ufo\n    formats: [ttf]\n    ttf:\n      source: Foo-Donor.ttf\n      tables: [GDEF, GSUB, GPOS]\n",
    );
    let toolkit = FakeToolkit::new(static_font("Foo-Regular"));
    let hinter = FakeHinter::default();

    Builder::load(&path).unwrap().build(&toolkit, &hinter).unwrap();

    assert_eq!(toolkit.calls(), vec!["compile ttf features=false"]);
    let data = read(&project.output("Foo/TTF/Foo-Regular.ttf"));
    for tag in [GDEF, GSUB, GPOS] {
        assert!(has_table(&data, tag).unwrap());
    }
}

#[test]
fn test_feature_params_add_labels() {
    let project = Project::new();
    let compiled = TestFont::new("Foo-Regular")
        .with_table(GSUB, layout_table(&["ss01", "liga"], &[]))
        .build();
    let path = project.descriptor(
        "fonts:\n  Foo-Regular:\n    source: Foo.ufo\n    formats: [ttf]\n    featureparams:\n      ss01: Single-storey a\n      ss02: Not in the font\n",
    );
    let toolkit = FakeToolkit::new(compiled);
    let hinter = FakeHinter::default();

    Builder::load(&path).unwrap().build(&toolkit, &hinter).unwrap();

    let data = read(&project.output("Foo/TTF/Foo-Regular.ttf"));
    assert_eq!(name(&data, 256).as_deref(), Some("Single-storey a"));
    assert_eq!(name(&data, 257), None);
}

#[test]
fn test_bad_version_string_is_a_parse_error() {
    let project = Project::new();
    let path = project.descriptor(
        "fonts:\n  Foo-Regular:\n    source: Foo.ufo\n    formats: [ttf]\n    names:\n      5: '1.23'\n",
    );
    let toolkit = FakeToolkit::new(static_font("Foo-Regular"));
    let hinter = FakeHinter::default();

    match Builder::load(&path).unwrap().build(&toolkit, &hinter) {
        Err(Error::Parse { font, value }) => {
            assert_eq!(font, "Foo-Regular");
            assert_eq!(value, "1.23");
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(parse_version("Version 1.23"), Some(1.23));
}

#[test]
fn test_keep_going_collects_failures() {
    let project = Project::new();
    let path = project.descriptor(
        "formats: [ttf]\nfonts:\n  Foo-Regular:\n    source: Foo.ufo\n    names: {5: Draft}\n  Foo-Bold:\n    source: Foo.ufo\n",
    );
    let toolkit = FakeToolkit::new(static_font("Foo-Regular"));
    let hinter = FakeHinter::default();

    let report = Builder::load(&path)
        .unwrap()
        .keep_going(true)
        .build(&toolkit, &hinter)
        .unwrap();

    assert!(!report.is_success());
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].0, "Foo-Regular");
    assert_eq!(report.artifacts, vec![project.output("Foo/TTF/Foo-Bold.ttf")]);
}

#[test]
fn test_cff_top_dict_mirrors_name_overrides() {
    let project = Project::new();
    let path = project.descriptor(
        "fonts:\n  Foo-Bold:\n    source: Foo.ufo\n    formats: [otf]\n    names:\n      0: Copyright 2026 Foo Type\n      1: Foo Text\n      4: Foo Text Bold\n      5: Version 2.50\n      6: FooText-Bold\n      7: Foo is a trademark\n",
    );
    let toolkit = FakeToolkit::new(TestFont::new("Foo-Bold").with_cff().build());
    let hinter = FakeHinter::default();

    Builder::load(&path).unwrap().build(&toolkit, &hinter).unwrap();

    let data = read(&project.output("Foo/OTF/Foo-Bold.otf"));
    assert_eq!(name(&data, 3).as_deref(), Some("2.50:NONE:FooText-Bold"));
    let font = FontRef::new(&data).unwrap();
    let cff = CffEditor::parse(font.table_data(CFF).unwrap().as_bytes()).unwrap();
    assert_eq!(cff.font_name(), "FooText-Bold");
    assert_eq!(
        cff.string(TopDictString::Copyright).as_deref(),
        Some("Copyright 2026 Foo Type")
    );
    assert_eq!(cff.string(TopDictString::FamilyName).as_deref(), Some("Foo Text"));
    assert_eq!(cff.string(TopDictString::FullName).as_deref(), Some("Foo Text Bold"));
    assert_eq!(cff.string(TopDictString::Version).as_deref(), Some("2.5"));
    assert_eq!(
        cff.string(TopDictString::Notice).as_deref(),
        Some("Foo is a trademark")
    );
}

#[test]
fn test_configured_unique_id_is_kept() {
    let project = Project::new();
    let path = project.descriptor(
        "fonts:\n  Foo-Bold:\n    source: Foo.ufo\n    formats: [ttf]\n    names:\n      3: Foo Bold 2026\n      5: Version 1.23\n      6: Foo-Bold\n",
    );
    let toolkit = FakeToolkit::new(static_font("Foo-Bold"));
    let hinter = FakeHinter::default();

    Builder::load(&path).unwrap().build(&toolkit, &hinter).unwrap();

    let data = read(&project.output("Foo/TTF/Foo-Bold.ttf"));
    assert_eq!(name(&data, 3).as_deref(), Some("Foo Bold 2026"));
    assert_eq!(name(&data, 5).as_deref(), Some("Version 1.23"));
}

#[test]
fn test_decompose_overlapping_components_only_for_ttf() {
    let project = Project::new();
    let path = project.descriptor(
        "fonts:\n  Foo-Regular:\n    source: Foo.ufo\n    formats: [ttf, otf]\n    components:\n      decompose: overlapping\n",
    );
    let toolkit = FakeToolkit::new(static_font("Foo-Regular"));
    let hinter = FakeHinter::default();

    let report = Builder::load(&path).unwrap().build(&toolkit, &hinter).unwrap();

    assert_eq!(
        report.artifacts,
        vec![
            project.output("Foo/TTF/Foo-Regular.ttf"),
            project.output("Foo/OTF/Foo-Regular.otf"),
        ]
    );
    // No CFF table in the compiled binary, so the OTF is not optimized.
    assert_eq!(
        toolkit.calls(),
        vec!["compile ttf features=true", "decompose", "compile otf features=true"]
    );
}

#[test]
fn test_explicit_stat_for_static_font() {
    let project = Project::new();
    let path = project.descriptor(
        "fonts:\n  Foo-Regular:\n    source: Foo.ufo\n    formats: [ttf]\n    STAT:\n      axes:\n        - tag: wght\n          name: Weight\n          values:\n            - {value: 400, name: Regular, flags: 2}\n        - tag: ital\n          name: Italic\n",
    );
    let toolkit = FakeToolkit::new(static_font("Foo-Regular"));
    let hinter = FakeHinter::default();

    Builder::load(&path).unwrap().build(&toolkit, &hinter).unwrap();

    assert_eq!(toolkit.calls(), vec!["compile ttf features=true", "stat 2 axes"]);
    let data = read(&project.output("Foo/TTF/Foo-Regular.ttf"));
    assert!(has_table(&data, STAT).unwrap());
}

#[test]
fn test_variable_otf_without_cff_is_not_optimized() {
    let project = Project::new();
    let config = resolve(&project, "Foo", "source: Foo.designspace\nformats: [otf]\n");
    let toolkit = FakeToolkit::new(static_font("Foo-Light")).with_variable(variable_font());
    let hinter = FakeHinter::default();

    let artifacts = FontBuild::new(&config, &toolkit, &hinter).build().unwrap();

    assert_eq!(artifacts, vec![project.output("Foo/OTFVF/Foo.otf")]);
    assert_eq!(
        toolkit.calls(),
        vec![
            "compile_interpolatable otf 2",
            "merge otf Foo-Light,Foo-Bold",
            "default stat",
        ]
    );
}

#[test]
fn test_donors_must_match_compiled_masters() {
    let project = Project::new();
    let donor = TestFont::new("Foo-Light")
        .with_table(GSUB, layout_table(&["liga"], &[]))
        .build();
    std::fs::write(project.dir.path().join("Foo-Light.ttf"), &donor).unwrap();
    std::fs::write(project.dir.path().join("Foo-Bold.ttf"), &donor).unwrap();
    let config = resolve(
        &project,
        "Foo",
        "source: Foo.designspace\nformats: [ttf]\ndonor:\n  source: [Foo-Light.ttf, Foo-Bold.ttf]\n  tables: [GSUB]\n",
    );
    let toolkit = FakeToolkit::new(static_font("Foo-Light"))
        .with_variable(variable_font())
        .returning_masters(1);
    let hinter = FakeHinter::default();

    let error = FontBuild::new(&config, &toolkit, &hinter).build().unwrap_err();

    match error {
        Error::Config(ConfigError::DonorCountMismatch { donors, masters, .. }) => {
            assert_eq!((donors, masters), (2, 1));
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(toolkit.merged.borrow().is_empty());
}

#[test]
fn test_identity_is_restored_after_failed_instance() {
    let project = Project::new();
    let config = resolve(
        &project,
        "Foo",
        "source: Foo.designspace\nformats: [ttf]\ninstances: all\n",
    );
    let toolkit = FakeToolkit::new(static_font("Foo-Light"))
        .with_variable(variable_font())
        .failing_instantiate();
    let hinter = FakeHinter::default();
    let mut build = FontBuild::new(&config, &toolkit, &hinter);
    let before = build.identity.clone();

    let error = build.build().unwrap_err();

    match error {
        Error::Toolkit {
            operation: "instancing",
            font,
            ..
        } => assert_eq!(font, "Foo-Light"),
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(build.identity, before);
    assert!(build.artifacts().is_empty());
}

#[test]
fn test_variable_subset_builds_its_own_instances() {
    let project = Project::new();
    project.file("latin.txt", "# latn\nA\n");
    let config = resolve(
        &project,
        "Foo",
        "source: Foo.designspace\nformats: [ttf]\ninstances:\n  Foo-Bold:\nsubsets:\n  Foo-Latin:\n    glyphlist: latin.txt\n",
    );
    let toolkit = FakeToolkit::new(static_font("Foo-Light")).with_variable(variable_font());
    let hinter = FakeHinter::default();

    let artifacts = FontBuild::new(&config, &toolkit, &hinter).build().unwrap();

    assert_eq!(
        toolkit.calls(),
        vec![
            "compile_interpolatable ttf 2",
            "merge ttf Foo-Light,Foo-Bold",
            "default stat",
            "subset 1 glyphs, scripts latn",
            "update instance names",
            "instantiate wght=700",
            "update instance names",
            "instantiate wght=700",
        ]
    );
    assert!(artifacts.contains(&project.output("Foo/TTFVF/Foo-Latin.ttf")));
    assert!(artifacts.contains(&project.output("Foo/TTF/Foo-Bold.ttf")));
    assert!(artifacts.contains(&project.output("Foo/TTFVF/Foo.ttf")));
}
