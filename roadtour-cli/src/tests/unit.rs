//! Focused unit tests covering configuration resolution and input loading.

use super::helpers::{TRIANGLE_NETWORK, Workspace};
use super::*;
use crate::neighbours::{NeighboursConfig, SampleConfig, list_neighbours, sample_request};
use crate::network::{CityCatalogue, NetworkSource, parse_network, require_existing};
use crate::route::{CompareArgs, CompareConfig, RouteArgs, RouteConfig, parse_algorithms};
use camino::Utf8PathBuf;
use roadtour::{Algorithm, NetworkError, Rejection};
use rstest::rstest;
use std::collections::BTreeMap;

fn catalogue(file: &str) -> CityCatalogue {
    let entries = BTreeMap::from([("Lviv".to_owned(), file.to_owned())]);
    CityCatalogue::new(Utf8PathBuf::from("."), entries)
}

#[rstest]
fn converting_without_request_path_errors() {
    let args = RouteArgs {
        network: Some(Utf8PathBuf::from("net.json")),
        ..RouteArgs::default()
    };
    match RouteConfig::try_from(args).expect_err("missing request") {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_REQUEST);
            assert_eq!(env, ENV_ROUTE_REQUEST);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
#[case(Some("net.json"), Some("Lviv"), None)]
#[case(None, None, None)]
#[case(None, Some("Lviv"), None)]
fn network_source_requires_exactly_one_choice(
    #[case] network: Option<&str>,
    #[case] city: Option<&str>,
    #[case] cities: Option<&str>,
) {
    let err = NetworkSource::resolve(
        network.map(Utf8PathBuf::from),
        city.map(str::to_owned),
        cities.map(Utf8PathBuf::from),
        ENV_ROUTE_CITIES,
    )
    .expect_err("invalid combination");
    match (network, city, err) {
        (Some(_), Some(_), CliError::ConflictingNetworkSource)
        | (None, None, CliError::MissingNetworkSource) => {}
        (None, Some(_), CliError::MissingArgument { field, env }) => {
            assert_eq!(field, ARG_CITIES);
            assert_eq!(env, ENV_ROUTE_CITIES);
        }
        (_, _, other) => panic!("unexpected error {other:?}"),
    }
}

#[rstest]
fn city_source_keeps_catalogue_path() {
    let source = NetworkSource::resolve(
        None,
        Some("Lviv".to_owned()),
        Some(Utf8PathBuf::from("cities.json")),
        ENV_ROUTE_CITIES,
    )
    .expect("valid city source");
    assert_eq!(source.label(), "Lviv");
    assert_eq!(
        source,
        NetworkSource::City {
            catalogue: Utf8PathBuf::from("cities.json"),
            city: "Lviv".to_owned(),
        }
    );
}

#[rstest]
#[case(0.0)]
#[case(-12.0)]
#[case(f64::NAN)]
fn rejects_unusable_speeds(#[case] speed: f64) {
    let args = RouteArgs {
        request_path: Some(Utf8PathBuf::from("request.json")),
        network: Some(Utf8PathBuf::from("net.json")),
        speed_kmh: Some(speed),
        ..RouteArgs::default()
    };
    match RouteConfig::try_from(args).expect_err("invalid speed") {
        CliError::InvalidSpeed { field, .. } => assert_eq!(field, ARG_SPEED),
        other => panic!("expected InvalidSpeed, found {other:?}"),
    }
}

#[rstest]
fn speed_flows_into_travel_model() {
    let args = RouteArgs {
        request_path: Some(Utf8PathBuf::from("request.json")),
        network: Some(Utf8PathBuf::from("net.json")),
        speed_kmh: Some(30.0),
        ..RouteArgs::default()
    };
    let config = RouteConfig::try_from(args).expect("valid config");
    assert_eq!(config.planner.travel.average_speed_kmh, 30.0);
}

#[rstest]
fn compare_defaults_to_every_tour_algorithm() {
    let args = CompareArgs {
        request_path: Some(Utf8PathBuf::from("request.json")),
        network: Some(Utf8PathBuf::from("net.json")),
        ..CompareArgs::default()
    };
    let config = CompareConfig::try_from(args).expect("valid config");
    assert_eq!(config.algorithms, Algorithm::TOURS.to_vec());
}

#[rstest]
fn parses_algorithm_lists() {
    let parsed = parse_algorithms("two_opt, Greedy Algorithm,,brute_force").expect("known names");
    assert_eq!(
        parsed,
        vec![Algorithm::TwoOpt, Algorithm::Greedy, Algorithm::BruteForce]
    );
}

#[rstest]
fn rejects_unknown_algorithm_names() {
    match parse_algorithms("greedy,dijkstra").expect_err("unknown name") {
        CliError::InvalidAlgorithm(rejection) => {
            assert_eq!(rejection, Rejection::UnknownAlgorithm("dijkstra".to_owned()));
        }
        other => panic!("expected InvalidAlgorithm, found {other:?}"),
    }
}

#[rstest]
#[case("../secret.json")]
#[case("nested/lviv.json")]
#[case("nested\\lviv.json")]
#[case("   ")]
#[case("")]
fn catalogue_rejects_unsafe_filenames(#[case] file: &str) {
    match catalogue(file).file_for("Lviv").expect_err("unsafe file") {
        CliError::UnsafeCityFile { city, file: named } => {
            assert_eq!(city, "Lviv");
            assert_eq!(named, file);
        }
        other => panic!("expected UnsafeCityFile, found {other:?}"),
    }
}

#[rstest]
fn catalogue_reports_unknown_cities() {
    match catalogue("lviv.json").file_for("Kyiv").expect_err("not listed") {
        CliError::UnknownCity { city } => assert_eq!(city, "Kyiv"),
        other => panic!("expected UnknownCity, found {other:?}"),
    }
}

#[rstest]
fn catalogue_reads_networks_beside_it() {
    let workspace = Workspace::new();
    workspace.triangle();
    let path = workspace.write("cities.json", r#"{"Lviv": "triangle.json"}"#);
    let catalogue = CityCatalogue::load(&path).expect("catalogue parses");
    assert_eq!(catalogue.cities().collect::<Vec<_>>(), vec!["Lviv"]);
    let network = catalogue.read_network("Lviv").expect("network loads");
    assert_eq!(network.node_count(), 4);
}

#[rstest]
fn network_documents_build_two_way_edges() {
    let network =
        parse_network(&Utf8PathBuf::from("triangle.json"), TRIANGLE_NETWORK).expect("valid");
    assert_eq!(network.node_count(), 4);
    assert_eq!(network.edge_count(), 6);
    let forward = network.edge_data(1, 2).expect("1 -> 2");
    let backward = network.edge_data(2, 1).expect("2 -> 1");
    assert_eq!(forward.length, 100.0);
    assert_eq!(
        forward.geometry.as_ref().map(|line| line.0.len()),
        Some(3)
    );
    assert_eq!(
        backward.geometry.as_ref().and_then(|line| line.0.first().copied()),
        forward.geometry.as_ref().and_then(|line| line.0.last().copied())
    );
}

#[rstest]
fn network_documents_reject_dangling_edges() {
    let document = r#"{"nodes": [{"id": 1, "lat": 0.0, "lon": 0.0}],
                       "edges": [{"from": 1, "to": 9, "length": 5.0}]}"#;
    match parse_network(&Utf8PathBuf::from("bad.json"), document).expect_err("dangling") {
        CliError::InvalidNetwork { source, .. } => {
            assert_eq!(source, NetworkError::UnknownNode(9));
        }
        other => panic!("expected InvalidNetwork, found {other:?}"),
    }
}

#[rstest]
fn network_documents_must_be_json() {
    match parse_network(&Utf8PathBuf::from("bad.json"), "{ nodes").expect_err("bad json") {
        CliError::ParseInput { what, .. } => assert_eq!(what, "road network"),
        other => panic!("expected ParseInput, found {other:?}"),
    }
}

#[rstest]
fn require_existing_distinguishes_missing_and_directories() {
    let workspace = Workspace::new();
    match require_existing(&workspace.path("absent.json"), ARG_NETWORK).expect_err("missing") {
        CliError::MissingSourceFile { field, .. } => assert_eq!(field, ARG_NETWORK),
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
    std::fs::create_dir(workspace.path("folder").as_std_path()).expect("mkdir");
    match require_existing(&workspace.path("folder"), ARG_NETWORK).expect_err("directory") {
        CliError::SourcePathNotFile { field, .. } => assert_eq!(field, ARG_NETWORK),
        other => panic!("expected SourcePathNotFile, found {other:?}"),
    }
    require_existing(&workspace.triangle(), ARG_NETWORK).expect("file exists");
}

#[rstest]
fn lists_neighbours_of_known_nodes() {
    let workspace = Workspace::new();
    let config = NeighboursConfig {
        node: 1,
        source: NetworkSource::File(workspace.triangle()),
    };
    let mut ids: Vec<u64> = list_neighbours(&config)
        .expect("node 1 exists")
        .iter()
        .map(|neighbour| neighbour.id)
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![2, 3]);
}

#[rstest]
fn unknown_nodes_have_no_neighbours() {
    let workspace = Workspace::new();
    let config = NeighboursConfig {
        node: 99,
        source: NetworkSource::File(workspace.triangle()),
    };
    match list_neighbours(&config).expect_err("unknown node") {
        CliError::UnknownNode(node) => assert_eq!(node, 99),
        other => panic!("expected UnknownNode, found {other:?}"),
    }
}

#[rstest]
fn sampling_is_seeded() {
    let workspace = Workspace::new();
    let config = SampleConfig {
        count: 3,
        seed: 11,
        algorithm: Algorithm::TwoOpt,
        trucks: 1,
        source: NetworkSource::File(workspace.triangle()),
    };
    let first = sample_request(&config).expect("enough nodes");
    let second = sample_request(&config).expect("enough nodes");
    assert_eq!(first, second);
    assert_eq!(first.algorithm, "two_opt");
    assert_eq!(first.seed, 11);
    let mut ids = first.node_ids.clone();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 3);
}

#[rstest]
fn sampling_more_stops_than_nodes_fails() {
    let workspace = Workspace::new();
    let config = SampleConfig {
        count: 10,
        seed: 0,
        algorithm: Algorithm::Approximate,
        trucks: 1,
        source: NetworkSource::File(workspace.triangle()),
    };
    match sample_request(&config).expect_err("only four nodes") {
        CliError::Sample(source) => assert_eq!(
            source,
            NetworkError::NotEnoughNodes {
                requested: 10,
                available: 4
            }
        ),
        other => panic!("expected Sample, found {other:?}"),
    }
}

#[rstest]
fn json_goes_to_the_output_file_when_set() {
    let workspace = Workspace::new();
    let output = workspace.path("out/result.json");
    let mut stdout = Vec::new();
    write_json(&mut stdout, Some(&output), &vec![1, 2, 3]).expect("written");
    assert!(stdout.is_empty());
    let written = std::fs::read_to_string(output.as_std_path()).expect("output exists");
    let parsed: Vec<u64> = serde_json::from_str(&written).expect("json");
    assert_eq!(parsed, vec![1, 2, 3]);
}
