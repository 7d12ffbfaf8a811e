use crate::domain::bookmarks::{Category, CategoryId, Link, LinkId, Selection, Snapshot};
use crate::domain::ids::IdGenerator;

// (name, url, desc) per seeded category
const DEMO_CONTENT: [(&str, &[(&str, &str, &str)]); 3] = [
    (
        "Development",
        &[
            (
                "MDN Web Docs",
                "https://developer.mozilla.org/",
                "Canonical docs for the web platform",
            ),
            ("Stack Overflow", "https://stackoverflow.com/", "Q&A for programmers"),
        ],
    ),
    (
        "News",
        &[(
            "Hacker News",
            "https://news.ycombinator.com/",
            "Tech news & discussions",
        )],
    ),
    ("Shopping", &[("Amazon", "https://amazon.com", "")]),
];

/// First-run content: three categories, four links, everything created at
/// `now`, selection on "all".
pub fn demo_snapshot<G: IdGenerator + ?Sized>(ids: &G, now: i64) -> Snapshot {
    let mut snapshot = Snapshot::default();
    for (category_name, links) in DEMO_CONTENT {
        let category = Category {
            id: CategoryId::new(ids.generate()),
            name: category_name.to_string(),
        };
        for (name, url, desc) in links {
            snapshot.links.push(Link {
                id: LinkId::new(ids.generate()),
                category_id: category.id.clone(),
                name: name.to_string(),
                url: url.to_string(),
                desc: desc.to_string(),
                created_at: now,
            });
        }
        snapshot.categories.push(category);
    }
    snapshot.selected_category_id = Selection::All;
    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::SequentialIds;

    #[test]
    fn demo_content_is_three_categories_and_four_links() {
        let snapshot = demo_snapshot(&SequentialIds::new("seed"), 1_000);
        let names: Vec<_> = snapshot.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Development", "News", "Shopping"]);
        assert_eq!(snapshot.links.len(), 4);
        assert!(snapshot.links.iter().all(|l| l.created_at == 1_000));
        assert!(snapshot.selected_category_id.is_all());
        let dev = &snapshot.categories[0].id;
        assert_eq!(snapshot.count_links_in(dev), 2);
    }
}
