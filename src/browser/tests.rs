use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use sharetree_remote_api::memory::{Call, MemoryHierarchy, Operation};
use sharetree_remote_api::{
    Collection, ConnectionContext, Credentials, EntryKind, IndexJob, IndexState, KindFilter,
    RemoteError, SearchSource,
};
use tokio::task::{LocalSet, spawn_local};
use tokio::time::{Instant, sleep};

use super::*;
use crate::preview::{PreviewKind, PreviewState};
use crate::session::ConnectionStatus;
use crate::tree::{ExpansionState, Node};

const LOCATION: &str = r"\\fs01\Shared";

async fn local<F: Future<Output = ()>>(future: F) {
    LocalSet::new().run_until(future).await;
}

fn catalog() -> MemoryHierarchy {
    MemoryHierarchy::new()
        .with_collection(Collection::located("Shared", LOCATION))
        .with_file("Shared/Docs/report.pdf", "application/pdf", b"%PDF-1.7".to_vec())
        .with_leaf("Shared/Docs/notes.txt", 12)
        .with_container("Shared/Invoices")
        .with_leaf("Shared/invoice-2024.txt", 120)
        .with_leaf("Shared/archive/invalid.log", 40)
        .with_file("Shared/readme.md", "text/markdown", "# hello")
}

fn location() -> ConnectionContext {
    ConnectionContext::Location(LOCATION.into())
}

/// Nothing happens on connect beyond listing the collections.
fn manual() -> BrowserOptions {
    BrowserOptions {
        auto_index: false,
        expand_first: false,
        ..BrowserOptions::default()
    }
}

async fn connected(options: BrowserOptions) -> (Rc<MemoryHierarchy>, Browser) {
    let remote = Rc::new(catalog());
    let browser = Browser::new(remote.clone(), options);
    browser.connect(location()).await.unwrap();
    remote.clear_calls();
    (remote, browser)
}

fn listings(remote: &MemoryHierarchy) -> Vec<String> {
    remote
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            Call::ListChildren { path, .. } => Some(path),
            _ => None,
        })
        .collect()
}

fn root() -> TreePath {
    TreePath::root("Shared")
}

fn node_state(browser: &Browser, path: &TreePath) -> Option<ExpansionState> {
    browser.state().tree().get_node(path).map(Node::state)
}

#[tokio::test(start_paused = true)]
async fn connecting_expands_the_first_collection() {
    local(async {
        let remote = Rc::new(catalog());
        let browser = Browser::new(
            remote.clone(),
            BrowserOptions {
                auto_index: false,
                ..BrowserOptions::default()
            },
        );
        browser.connect(location()).await.unwrap();

        let state = browser.state();
        assert_eq!(state.session().status(), &ConnectionStatus::Connected);
        assert_eq!(
            state.tree().get_node(&root()).map(Node::state),
            Some(ExpansionState::Expanded)
        );
        assert_eq!(listings(&remote), [""]);
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn failed_connections_are_reported() {
    local(async {
        let remote = Rc::new(catalog());
        remote.fail_next(
            Operation::ListCollections,
            RemoteError::Transport("refused".into()),
        );
        let browser = Browser::new(remote.clone(), manual());
        let err = browser.connect(location()).await.unwrap_err();
        assert_eq!(err.to_string(), "connection failed: refused");
        assert_eq!(
            browser.state().session().status(),
            &ConnectionStatus::Failed("connection failed: refused".into())
        );
        assert!(browser.state().tree().is_empty());
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn repeated_toggles_while_expanding_issue_one_listing() {
    local(async {
        let (remote, browser) = connected(manual()).await;
        remote.set_latency(Operation::ListChildren, Duration::from_millis(200));

        let first = {
            let browser = browser.clone();
            spawn_local(async move { browser.toggle(&root()).await })
        };
        sleep(Duration::from_millis(10)).await;
        assert!(browser.state().is_expanding(&root()));

        for _ in 0..3 {
            assert_eq!(
                browser.toggle(&root()).await.unwrap(),
                ToggleOutcome::Ignored
            );
        }
        assert_eq!(first.await.unwrap().unwrap(), ToggleOutcome::Expanded);
        assert_eq!(remote.count(Operation::ListChildren), 1);
        assert!(!browser.state().is_expanding(&root()));
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn collapsing_discards_children_and_reexpanding_fetches_again() {
    local(async {
        let (remote, browser) = connected(manual()).await;
        assert_eq!(
            browser.toggle(&root()).await.unwrap(),
            ToggleOutcome::Expanded
        );
        assert_eq!(
            browser.toggle(&root()).await.unwrap(),
            ToggleOutcome::Collapsed
        );
        assert!(browser.state().tree().get_node(&root().child("Docs")).is_none());

        browser.toggle(&root()).await.unwrap();
        assert_eq!(listings(&remote), ["", ""]);
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn failed_expansions_revert_and_can_be_retried() {
    local(async {
        let (remote, browser) = connected(manual()).await;
        remote.deny("Docs", "Access denied");
        browser.toggle(&root()).await.unwrap();

        let docs = root().child("Docs");
        let err = browser.toggle(&docs).await.unwrap_err();
        assert_eq!(err.to_string(), "Access denied");
        assert_eq!(node_state(&browser, &docs), Some(ExpansionState::Collapsed));

        assert!(browser.toggle(&docs).await.is_err());
        assert_eq!(listings(&remote), ["", "Docs", "Docs"]);
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn abandoned_expansions_revert_to_collapsed() {
    local(async {
        let (remote, browser) = connected(manual()).await;
        remote.set_latency(Operation::ListChildren, Duration::from_millis(200));

        let task = {
            let browser = browser.clone();
            spawn_local(async move { browser.toggle(&root()).await })
        };
        sleep(Duration::from_millis(10)).await;
        task.abort();
        sleep(Duration::from_millis(10)).await;

        assert_eq!(node_state(&browser, &root()), Some(ExpansionState::Collapsed));
        assert!(!browser.state().is_expanding(&root()));
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn listings_from_a_previous_connection_are_dropped() {
    local(async {
        let (remote, browser) = connected(manual()).await;
        remote.set_latency(Operation::ListChildren, Duration::from_millis(200));

        let stale = {
            let browser = browser.clone();
            spawn_local(async move { browser.toggle(&root()).await })
        };
        sleep(Duration::from_millis(10)).await;
        browser.connect(location()).await.unwrap();

        assert_eq!(stale.await.unwrap().unwrap(), ToggleOutcome::Stale);
        assert_eq!(node_state(&browser, &root()), Some(ExpansionState::Collapsed));
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn revealing_a_nested_file_lists_each_level_once_then_opens_it() {
    local(async {
        let (remote, browser) = connected(manual()).await;

        let outcome = browser
            .expand_to_path("Docs/report.pdf", true)
            .await
            .unwrap();
        let report = TreePath::from_relative("Shared", "Docs/report.pdf");
        assert_eq!(outcome, NavigationOutcome::Opened(report.clone()));

        assert_eq!(
            remote.calls(),
            vec![
                Call::ListChildren {
                    collection: "Shared".into(),
                    path: String::new()
                },
                Call::ListChildren {
                    collection: "Shared".into(),
                    path: "Docs".into()
                },
                Call::FetchFile {
                    collection: "Shared".into(),
                    path: "Docs/report.pdf".into()
                },
            ]
        );
        match browser.state().preview().state() {
            PreviewState::Ready(content) => {
                assert_eq!(content.path, report);
                assert_eq!(content.kind, PreviewKind::Pdf);
            }
            other => panic!("unexpected preview {other:?}"),
        }
        assert_eq!(browser.take_focus(), Some(report));
        assert_eq!(browser.take_focus(), None);
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn revealing_loaded_paths_issues_no_requests() {
    local(async {
        let (remote, browser) = connected(manual()).await;
        browser.expand_to_path("Docs", false).await.unwrap();
        remote.clear_calls();

        let outcome = browser
            .expand_to_path("Docs/report.pdf", false)
            .await
            .unwrap();
        let report = TreePath::from_relative("Shared", "Docs/report.pdf");
        assert_eq!(outcome, NavigationOutcome::Revealed(report.clone()));
        assert!(remote.calls().is_empty());

        let now = Instant::now();
        assert_eq!(browser.state().highlighted(now), Some(&report));
        sleep(Duration::from_secs(2)).await;
        assert_eq!(browser.state().highlighted(Instant::now()), None);
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn revealing_collapsed_paths_lists_ancestors_shallowest_first() {
    local(async {
        let remote = Rc::new(
            MemoryHierarchy::new()
                .with_collection(Collection::located("Shared", LOCATION))
                .with_leaf("Shared/a/b/c/deep.txt", 3),
        );
        let browser = Browser::new(remote.clone(), manual());
        browser.connect(location()).await.unwrap();
        remote.clear_calls();

        let outcome = browser
            .expand_to_path("a/b/c/deep.txt", false)
            .await
            .unwrap();
        assert_eq!(
            outcome,
            NavigationOutcome::Revealed(TreePath::from_relative("Shared", "a/b/c/deep.txt"))
        );
        assert_eq!(listings(&remote), ["", "a", "a/b", "a/b/c"]);
        assert_eq!(remote.count(Operation::FetchFile), 0);
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn revealing_a_container_expands_it() {
    local(async {
        let (_, browser) = connected(manual()).await;
        let outcome = browser.expand_to_path("Docs", false).await.unwrap();
        let docs = root().child("Docs");
        assert_eq!(outcome, NavigationOutcome::Revealed(docs.clone()));
        assert_eq!(node_state(&browser, &docs), Some(ExpansionState::Expanded));
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn missing_segments_stop_silently() {
    local(async {
        let (remote, browser) = connected(manual()).await;
        let outcome = browser
            .expand_to_path("Docs/nope/report.pdf", true)
            .await
            .unwrap();
        assert_eq!(
            outcome,
            NavigationOutcome::NotFound {
                missing: "Shared/Docs/nope".into()
            }
        );
        assert_eq!(listings(&remote), ["", "Docs"]);
        assert!(browser.state().notice().is_none());
        assert_eq!(browser.state().preview().state(), &PreviewState::Empty);
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn revealing_joins_an_expansion_already_in_flight() {
    local(async {
        let (remote, browser) = connected(manual()).await;
        remote.set_latency(Operation::ListChildren, Duration::from_millis(100));

        let toggle = {
            let browser = browser.clone();
            spawn_local(async move { browser.toggle(&root()).await })
        };
        sleep(Duration::from_millis(10)).await;

        let outcome = browser.expand_to_path("Docs", false).await.unwrap();
        assert!(matches!(outcome, NavigationOutcome::Revealed(_)));
        assert_eq!(toggle.await.unwrap().unwrap(), ToggleOutcome::Expanded);
        assert_eq!(listings(&remote), ["", "Docs"]);
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn collapsing_a_parent_ends_expansions_in_flight_below_it() {
    local(async {
        let (remote, browser) = connected(manual()).await;
        browser.toggle(&root()).await.unwrap();
        let docs = root().child("Docs");

        remote.set_latency(Operation::ListChildren, Duration::from_millis(300));
        let first = {
            let (browser, docs) = (browser.clone(), docs.clone());
            spawn_local(async move { browser.toggle(&docs).await })
        };
        sleep(Duration::from_millis(10)).await;
        let reveal = {
            let browser = browser.clone();
            spawn_local(async move { browser.expand_to_path("Docs/report.pdf", false).await })
        };
        sleep(Duration::from_millis(10)).await;

        assert_eq!(
            browser.toggle(&root()).await.unwrap(),
            ToggleOutcome::Collapsed
        );
        remote.set_latency(Operation::ListChildren, Duration::from_millis(10));
        assert_eq!(
            browser.toggle(&root()).await.unwrap(),
            ToggleOutcome::Expanded
        );
        let outcome = tokio::time::timeout(Duration::from_secs(1), reveal)
            .await
            .expect("reveal waits on an expansion that was collapsed away")
            .unwrap()
            .unwrap();
        assert!(matches!(outcome, NavigationOutcome::NotFound { .. }));

        remote.set_latency(Operation::ListChildren, Duration::from_millis(300));
        let second = {
            let (browser, docs) = (browser.clone(), docs.clone());
            spawn_local(async move { browser.toggle(&docs).await })
        };
        // The first listing lands while the second is still in flight.
        sleep(Duration::from_millis(290)).await;
        assert_eq!(first.await.unwrap().unwrap(), ToggleOutcome::Stale);
        assert_eq!(node_state(&browser, &docs), Some(ExpansionState::Expanding));
        assert!(browser.state().is_expanding(&docs));

        assert_eq!(second.await.unwrap().unwrap(), ToggleOutcome::Expanded);
        assert_eq!(node_state(&browser, &docs), Some(ExpansionState::Expanded));
        assert!(!browser.state().is_expanding(&docs));
        assert_eq!(listings(&remote), ["", "Docs", "", "Docs"]);
        assert!(browser.state().waiters.is_empty());
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn clicking_and_revealing_open_files_the_same_way() {
    local(async {
        let (clicked_remote, clicked) = connected(manual()).await;
        clicked.toggle(&root()).await.unwrap();
        clicked.activate(&root().child("readme.md")).await.unwrap();

        let (revealed_remote, revealed) = connected(manual()).await;
        revealed.expand_to_path("readme.md", true).await.unwrap();

        assert_eq!(clicked.state().preview().state(), revealed.state().preview().state());
        assert_eq!(clicked_remote.calls(), revealed_remote.calls());
        match clicked.state().preview().state() {
            PreviewState::Ready(content) => assert!(content.is_text()),
            other => panic!("unexpected preview {other:?}"),
        }
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn failed_fetches_show_in_the_preview() {
    local(async {
        let (_, browser) = connected(manual()).await;
        let missing = TreePath::from_relative("Shared", "Docs/missing.txt");
        assert!(browser.open_file(&missing).await);
        assert_eq!(
            browser.state().preview().state(),
            &PreviewState::Failed {
                path: missing,
                message: "Docs/missing.txt: no such file".into()
            }
        );
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn the_latest_preview_wins() {
    local(async {
        let (remote, browser) = connected(manual()).await;
        remote.set_latency(Operation::FetchFile, Duration::from_millis(100));

        let first = {
            let browser = browser.clone();
            spawn_local(async move {
                browser
                    .open_file(&TreePath::from_relative("Shared", "Docs/report.pdf"))
                    .await
            })
        };
        sleep(Duration::from_millis(10)).await;
        let readme = TreePath::from_relative("Shared", "readme.md");
        assert!(browser.open_file(&readme).await);
        assert!(!first.await.unwrap());
        assert_eq!(browser.state().preview().state().path(), Some(&readme));
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn typing_is_debounced_into_one_search() {
    local(async {
        let (remote, browser) = connected(manual()).await;
        browser.set_query("i");
        sleep(Duration::from_millis(100)).await;
        browser.set_query("in");
        sleep(Duration::from_millis(100)).await;
        browser.set_query("inv");
        sleep(Duration::from_millis(250)).await;
        assert_eq!(remote.count(Operation::Search), 0);

        sleep(Duration::from_millis(100)).await;
        assert_eq!(
            remote.calls(),
            vec![Call::Search {
                text: "inv".into()
            }]
        );
        let state = browser.state();
        let results = state.search().results().unwrap();
        assert_eq!(results.source, SearchSource::Live);
        assert_eq!(results.hits.len(), 3);
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn delayed_responses_never_overwrite_newer_queries() {
    local(async {
        let (remote, browser) = connected(manual()).await;
        remote.set_search_latency("inv", Duration::from_secs(1));

        browser.set_query("inv");
        sleep(Duration::from_millis(350)).await;
        assert!(matches!(
            browser.state().search().view(),
            SearchView::Loading { .. }
        ));

        browser.set_query("invoice");
        sleep(Duration::from_secs(2)).await;

        let state = browser.state();
        let results = state.search().results().unwrap();
        assert_eq!(results.query.text, "invoice");
        assert_eq!(remote.count(Operation::Search), 2);
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn clearing_the_query_discards_the_request_in_flight() {
    local(async {
        let (remote, browser) = connected(manual()).await;
        remote.set_search_latency("inv", Duration::from_secs(1));

        browser.set_query("inv");
        sleep(Duration::from_millis(350)).await;
        browser.set_query("   ");
        sleep(Duration::from_secs(2)).await;

        assert_eq!(browser.state().search().view(), &SearchView::Tree);
        assert!(!browser.state().search().is_pending());
        assert_eq!(remote.count(Operation::Search), 1);
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn leaf_filter_narrows_name_matches_to_files() {
    local(async {
        let (_, browser) = connected(manual()).await;
        browser.set_kind_filter(KindFilter::Leaf);
        browser.set_query("inv");
        sleep(Duration::from_millis(400)).await;

        let state = browser.state();
        let names: Vec<_> = state
            .search()
            .results()
            .unwrap()
            .hits
            .iter()
            .map(|hit| hit.name.clone())
            .collect();
        assert_eq!(names, ["invoice-2024.txt", "invalid.log"]);
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn changing_filters_reissues_the_query() {
    local(async {
        let (remote, browser) = connected(manual()).await;
        browser.toggle_exact();
        assert_eq!(remote.count(Operation::Search), 0);

        browser.set_query("invoice-2024.txt");
        sleep(Duration::from_millis(400)).await;
        browser.cycle_kind_filter();
        sleep(Duration::from_millis(400)).await;

        assert_eq!(remote.count(Operation::Search), 2);
        let state = browser.state();
        let results = state.search().results().unwrap();
        assert!(results.query.exact);
        assert_eq!(results.query.kind, KindFilter::Leaf);
        assert_eq!(results.hits.len(), 1);
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn failed_searches_can_be_retried() {
    local(async {
        let (remote, browser) = connected(manual()).await;
        remote.fail_next(Operation::Search, RemoteError::Transport("reset".into()));
        browser.set_query("inv");
        sleep(Duration::from_millis(400)).await;
        assert_eq!(
            browser.state().search().view(),
            &SearchView::Failed {
                query: "inv".into(),
                message: "connection failed: reset".into()
            }
        );

        browser.retry_search();
        sleep(Duration::from_millis(400)).await;
        assert!(browser.state().search().results().is_some());
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn connections_without_an_index_filter_loaded_nodes() {
    local(async {
        let remote = Rc::new(
            MemoryHierarchy::new()
                .with_collection(Collection::new("Public"))
                .with_leaf("Public/invoice.txt", 1)
                .with_leaf("Public/old/invoice-1999.txt", 1),
        );
        let browser = Browser::new(
            remote.clone(),
            BrowserOptions {
                auto_index: false,
                ..BrowserOptions::default()
            },
        );
        let context = ConnectionContext::Host {
            host: "fs01".into(),
            credentials: Credentials::new("alice", "secret"),
        };
        browser.connect(context).await.unwrap();

        browser.set_query("INV");
        let matched = |browser: &Browser| match browser.state().search().view() {
            SearchView::LocalFilter(matches) => matches.match_count(),
            other => panic!("unexpected view {other:?}"),
        };
        assert_eq!(matched(&browser), 1);

        browser
            .toggle(&TreePath::from_relative("Public", "old"))
            .await
            .unwrap();
        assert_eq!(matched(&browser), 2);

        sleep(Duration::from_secs(1)).await;
        assert_eq!(remote.count(Operation::Search), 0);
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn opening_results() {
    local(async {
        let (remote, browser) = connected(manual()).await;
        browser.set_query("inv");
        sleep(Duration::from_millis(400)).await;

        // [Invoices, invoice-2024.txt, archive/invalid.log]
        let opened = browser.open_result(1).await.unwrap();
        assert_eq!(
            opened,
            Some(NavigationOutcome::Opened(TreePath::from_relative(
                "Shared",
                "invoice-2024.txt"
            )))
        );
        assert!(browser.state().search().results().is_some());
        assert_eq!(remote.count(Operation::FetchFile), 1);

        let revealed = browser.open_result(0).await.unwrap();
        let invoices = root().child("Invoices");
        assert_eq!(revealed, Some(NavigationOutcome::Revealed(invoices.clone())));
        assert_eq!(browser.state().search().view(), &SearchView::Tree);
        assert_eq!(node_state(&browser, &invoices), Some(ExpansionState::Expanded));
        assert_eq!(browser.open_result(0).await.unwrap(), None);
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn locating_a_leaf_reveals_and_opens_it() {
    local(async {
        let (_, browser) = connected(manual()).await;
        browser.set_query("invalid");
        sleep(Duration::from_millis(400)).await;

        let located = browser.locate_result(0).await.unwrap();
        let invalid = TreePath::from_relative("Shared", "archive/invalid.log");
        assert_eq!(located, Some(NavigationOutcome::Opened(invalid.clone())));
        assert_eq!(browser.state().search().view(), &SearchView::Tree);
        assert_eq!(
            node_state(&browser, &root().child("archive")),
            Some(ExpansionState::Expanded)
        );
        assert_eq!(browser.state().preview().state().path(), Some(&invalid));
    })
    .await;
}

fn indexing() -> BrowserOptions {
    BrowserOptions {
        expand_first: false,
        ..BrowserOptions::default()
    }
}

#[tokio::test(start_paused = true)]
async fn indexing_starts_on_connect_and_polls_until_ready() {
    local(async {
        let remote = Rc::new(catalog());
        let browser = Browser::new(remote.clone(), indexing());
        browser.connect(location()).await.unwrap();
        assert_eq!(browser.state().index().state(), IndexState::Indexing);
        assert!(!browser.start_indexing());

        sleep(Duration::from_millis(250)).await;
        assert_eq!(remote.count(Operation::StartIndex), 1);
        assert_eq!(remote.count(Operation::IndexStatus), 0);

        sleep(Duration::from_millis(500)).await;
        assert_eq!(remote.count(Operation::IndexStatus), 1);
        let index = browser.state().index().job();
        assert_eq!(index.state, IndexState::Ready);
        assert_eq!(index.processed, remote.index_job().processed);

        sleep(Duration::from_secs(3)).await;
        assert_eq!(remote.count(Operation::IndexStatus), 1);
        assert!(!browser.state().index().is_polling());
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn polling_reports_progress_and_survives_missed_ticks() {
    local(async {
        let remote = Rc::new(catalog());
        remote.script_index_statuses([
            Ok(IndexJob::indexing(10)),
            Ok(IndexJob::indexing(25)),
            Err(RemoteError::Transport("timeout".into())),
            Ok(IndexJob::ready(40)),
        ]);
        let browser = Browser::new(remote.clone(), indexing());
        browser.connect(location()).await.unwrap();

        sleep(Duration::from_millis(750)).await;
        assert_eq!(browser.state().index().processed(), 10);
        sleep(Duration::from_millis(500)).await;
        assert_eq!(browser.state().index().processed(), 25);
        sleep(Duration::from_millis(500)).await;
        assert_eq!(browser.state().index().state(), IndexState::Indexing);
        assert_eq!(browser.state().index().processed(), 25);
        sleep(Duration::from_millis(500)).await;
        assert_eq!(browser.state().index().state(), IndexState::Ready);
        assert_eq!(browser.state().index().processed(), 40);
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn failed_starts_leave_the_index_in_error() {
    local(async {
        let remote = Rc::new(catalog());
        remote.fail_next(
            Operation::StartIndex,
            RemoteError::backend("indexing unavailable"),
        );
        let browser = Browser::new(remote.clone(), indexing());
        browser.connect(location()).await.unwrap();

        sleep(Duration::from_secs(2)).await;
        assert_eq!(browser.state().index().state(), IndexState::Error);
        assert_eq!(remote.count(Operation::IndexStatus), 0);
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn clearing_restarts_from_zero() {
    local(async {
        let remote = Rc::new(catalog());
        let browser = Browser::new(remote.clone(), indexing());
        browser.connect(location()).await.unwrap();
        sleep(Duration::from_millis(600)).await;
        assert_eq!(browser.state().index().state(), IndexState::Ready);
        remote.clear_calls();

        assert!(browser.clear_index());
        assert_eq!(browser.state().index().state(), IndexState::Indexing);
        assert_eq!(browser.state().index().processed(), 0);

        sleep(Duration::from_millis(600)).await;
        assert_eq!(
            remote.calls(),
            vec![Call::ClearIndex, Call::StartIndex, Call::IndexStatus]
        );
        assert_eq!(browser.state().index().state(), IndexState::Ready);
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn reconnecting_returns_the_index_to_idle() {
    local(async {
        let remote = Rc::new(catalog());
        remote.script_index_statuses((0..20).map(|count| Ok(IndexJob::indexing(count))));
        let browser = Browser::new(remote.clone(), indexing());
        browser.connect(location()).await.unwrap();
        sleep(Duration::from_millis(600)).await;
        assert!(browser.state().index().is_polling());

        remote.fail_next(
            Operation::ListCollections,
            RemoteError::Transport("refused".into()),
        );
        assert!(browser.connect(location()).await.is_err());
        assert_eq!(browser.state().index().state(), IndexState::Idle);
        assert!(!browser.state().index().is_polling());

        let polls = remote.count(Operation::IndexStatus);
        sleep(Duration::from_secs(2)).await;
        assert_eq!(remote.count(Operation::IndexStatus), polls);
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn a_ready_index_shortens_the_debounce() {
    local(async {
        let remote = Rc::new(catalog());
        let browser = Browser::new(remote.clone(), indexing());
        browser.connect(location()).await.unwrap();
        sleep(Duration::from_millis(600)).await;

        browser.set_query("report");
        sleep(Duration::from_millis(60)).await;
        let state = browser.state();
        let results = state.search().results().unwrap();
        assert_eq!(results.source, SearchSource::Indexed);
        assert_eq!(results.hits[0].kind, EntryKind::Leaf);
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn reports_land_in_the_notice() {
    local(async {
        let (_, browser) = connected(manual()).await;
        browser.report("Expanding Docs", &RemoteError::backend("Access denied"));
        let notice = browser.state().notice().cloned().unwrap();
        assert!(notice.is_error);
        assert_eq!(notice.message, "Expanding Docs: Access denied");
        browser.dismiss_notice();
        assert!(browser.state().notice().is_none());
    })
    .await;
}
