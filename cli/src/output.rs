use std::io;
use std::io::Write;

use appsel_engine::DisplayNode;
use appsel_engine::DisplayTree;
use appsel_engine::Facets;
use owo_colors::OwoColorize;
use serde_json::json;

pub(crate) const EMPTY_RESULT: &str = "No applications match.";

/// One line per top-level node; groups are followed by their members,
/// indented by two spaces.
pub(crate) fn write_tree(out: &mut impl Write, tree: &DisplayTree, styled: bool) -> io::Result<()> {
    if tree.is_empty() {
        return writeln!(out, "{EMPTY_RESULT}");
    }

    for node in tree.nodes() {
        match node {
            DisplayNode::Leaf { display_name, .. } => writeln!(out, "{display_name}")?,
            DisplayNode::ExpandableGroup {
                display_name,
                children,
            } => {
                let label = format!("{display_name}/");
                let count = format!(" ({})", children.len());
                if styled {
                    writeln!(out, "{}{}", label.bold(), count.dimmed())?;
                } else {
                    writeln!(out, "{label}{count}")?;
                }
                for child in children {
                    writeln!(out, "  {}", child.display_name())?;
                }
            }
        }
    }
    Ok(())
}

pub(crate) fn write_tree_json(out: &mut impl Write, tree: &DisplayTree) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, tree)?;
    writeln!(out)?;
    Ok(())
}

pub(crate) fn write_facets(out: &mut impl Write, facets: &Facets, styled: bool) -> io::Result<()> {
    let rows = [
        ("source kinds", facets.source_kinds().collect::<Vec<_>>()),
        ("profile types", facets.profile_types().collect::<Vec<_>>()),
    ];
    for (label, values) in rows {
        let values = if values.is_empty() {
            "-".to_string()
        } else {
            values.join(", ")
        };
        if styled {
            writeln!(out, "{}: {values}", label.cyan())?;
        } else {
            writeln!(out, "{label}: {values}")?;
        }
    }
    Ok(())
}

pub(crate) fn write_facets_json(out: &mut impl Write, facets: &Facets) -> anyhow::Result<()> {
    let value = json!({
        "source_kinds": facets.source_kinds().collect::<Vec<_>>(),
        "profile_types": facets.profile_types().collect::<Vec<_>>(),
    });
    serde_json::to_writer_pretty(&mut *out, &value)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use appsel_engine::ApplicationDescriptor;
    use appsel_engine::FilterSelection;
    use appsel_engine::Hierarchy;
    use appsel_engine::evaluate;
    use pretty_assertions::assert_eq;

    fn apps() -> Vec<ApplicationDescriptor> {
        vec![
            ApplicationDescriptor::new("single", "unknown", "unknown"),
            ApplicationDescriptor::new("double.cpu", "rbspy", "unknown"),
            ApplicationDescriptor::new("double.space", "gospy", "unknown"),
        ]
    }

    fn render(tree: &DisplayTree) -> String {
        let mut out = Vec::new();
        match write_tree(&mut out, tree, false) {
            Ok(()) => String::from_utf8_lossy(&out).into_owned(),
            Err(err) => panic!("write failed: {err}"),
        }
    }

    #[test]
    fn text_tree_indents_group_members() {
        let tree = evaluate(&Hierarchy::build(&apps()), &FilterSelection::new());

        assert_eq!(
            render(&tree),
            "single\ndouble/ (2)\n  double.cpu\n  double.space\n"
        );
    }

    #[test]
    fn empty_tree_prints_placeholder() {
        let tree = evaluate(
            &Hierarchy::build(&apps()),
            &FilterSelection::new().with_query("nothing"),
        );

        assert_eq!(render(&tree), "No applications match.\n");
    }

    #[test]
    fn facets_list_both_axes() {
        let mut out = Vec::new();
        let written = write_facets(&mut out, &Facets::collect(&apps()), false);

        assert!(written.is_ok());
        assert_eq!(
            String::from_utf8_lossy(&out),
            "source kinds: unknown, rbspy, gospy\nprofile types: cpu, space\n"
        );
    }

    #[test]
    fn facets_of_nothing_use_a_dash() {
        let mut out = Vec::new();
        let written = write_facets(&mut out, &Facets::default(), false);

        assert!(written.is_ok());
        assert_eq!(
            String::from_utf8_lossy(&out),
            "source kinds: -\nprofile types: -\n"
        );
    }
}
