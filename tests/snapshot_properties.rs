use link_manager_lib::{
    BookmarkStore, Category, CategoryId, FixedClock, JsonFileSnapshotRepo, Link, LinkId,
    MemorySnapshotRepo, Selection, SequentialIds, Snapshot, SnapshotRepo, SqliteSnapshotRepo,
};
use proptest::prelude::*;

// Valid snapshots: unique ids, every link in an existing category
fn arb_snapshot() -> impl Strategy<Value = Snapshot> {
    (1usize..5)
        .prop_flat_map(|n_categories| {
            (
                Just(n_categories),
                proptest::collection::vec(
                    (0..n_categories, "[a-z ]{1,12}", "[a-z.]{1,12}", ".{0,16}", 0i64..5),
                    0..12,
                ),
                0..=n_categories,
            )
        })
        .prop_map(|(n_categories, links, selected)| {
            let categories: Vec<Category> = (0..n_categories)
                .map(|i| Category {
                    id: CategoryId::new(format!("c{i}")),
                    name: format!("Category {i}"),
                })
                .collect();
            let links = links
                .into_iter()
                .enumerate()
                .map(|(i, (cat, name, url, desc, created_at))| Link {
                    id: LinkId::new(format!("l{i}")),
                    category_id: categories[cat].id.clone(),
                    name,
                    url: format!("https://{url}"),
                    desc,
                    created_at,
                })
                .collect();
            let selected_category_id = if selected == n_categories {
                Selection::All
            } else {
                Selection::Category(categories[selected].id.clone())
            };
            Snapshot {
                categories,
                links,
                selected_category_id,
            }
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn sqlite_round_trip(snapshot in arb_snapshot()) {
        let mut repo = SqliteSnapshotRepo::open_in_memory("lm").unwrap();
        repo.save(&snapshot).unwrap();
        prop_assert_eq!(repo.load(), snapshot);
    }

    #[test]
    fn json_file_round_trip(snapshot in arb_snapshot()) {
        let dir = tempfile::tempdir().unwrap();
        let mut repo = JsonFileSnapshotRepo::new(dir.path().join("bookmarks.json"));
        repo.save(&snapshot).unwrap();
        prop_assert_eq!(repo.load(), snapshot);
    }

    #[test]
    fn scoped_links_are_sorted_and_stable(snapshot in arb_snapshot()) {
        let repo = MemorySnapshotRepo::new();
        let mut seeded = repo.clone();
        seeded.save(&snapshot).unwrap();
        let store = BookmarkStore::open(repo, SequentialIds::new("x"), FixedClock::at(0)).unwrap();

        let scoped = store.links_for_selection();
        for pair in scoped.windows(2) {
            prop_assert!(pair[0].created_at >= pair[1].created_at);
            if pair[0].created_at == pair[1].created_at {
                let pos = |id: &LinkId| snapshot.links.iter().position(|l| &l.id == id).unwrap();
                prop_assert!(pos(&pair[0].id) < pos(&pair[1].id));
            }
        }
        if let Selection::Category(id) = store.selection() {
            prop_assert!(scoped.iter().all(|l| &l.category_id == id));
        } else {
            prop_assert_eq!(scoped.len(), snapshot.links.len());
        }
        prop_assert_eq!(store.links_matching(""), scoped);
    }

    #[test]
    fn cascade_leaves_no_orphans(snapshot in arb_snapshot(), victim in 0usize..5) {
        let repo = MemorySnapshotRepo::new();
        let mut seeded = repo.clone();
        seeded.save(&snapshot).unwrap();
        let mut store = BookmarkStore::open(repo.clone(), SequentialIds::new("x"), FixedClock::at(0)).unwrap();

        let id = snapshot.categories[victim % snapshot.categories.len()].id.clone();
        let was_selected = store.selection().is_category(&id);
        let expected_removed = store.category_count(&id);
        let removal = store.delete_category(&id).unwrap();

        prop_assert_eq!(removal.removed_links, expected_removed);
        prop_assert!(store.links().iter().all(|l| l.category_id != id));
        if was_selected {
            prop_assert!(store.selection().is_all());
        }
        prop_assert_eq!(repo.load(), store.snapshot().clone());
    }
}
