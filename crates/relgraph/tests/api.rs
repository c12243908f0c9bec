//! Integration tests for the public API

use std::fs;
use std::path::PathBuf;

use relgraph::plugins::class::{ClassRegistry, ClassSource, FieldSource};
use relgraph::plugins::instance::InstanceSet;
use relgraph::prelude::*;
use relgraph::{generate_class_diagram, generate_instance_diagram};
use tempfile::TempDir;

fn demo(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../demos")
        .join(name);
    fs::read_to_string(path).unwrap()
}

#[test]
fn test_animal_hierarchy_scenario() {
    let graph = extract_class_graph(&[
        ClassSource::new("Animal"),
        ClassSource::new("Dog").with_base("Animal"),
        ClassSource::new("Cat").with_base("Animal"),
    ])
    .unwrap();

    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.edges_of_kind(EdgeKind::Inherits).count(), 2);
    assert!(graph.has_edge("Dog", "Animal", EdgeKind::Inherits));
    assert!(graph.has_edge("Cat", "Animal", EdgeKind::Inherits));

    let plan = compute_layout(&graph, Direction::Down, LinkStyle::Orthogonal).unwrap();
    assert_eq!(plan.depth_of("Animal"), Some(0));
    assert_eq!(plan.depth_of("Dog"), Some(1));
    assert_eq!(plan.depth_of("Cat"), Some(1));
}

#[test]
fn test_owner_pets_scenario() {
    let graph = extract_instance_graph(&[
        InstanceDescriptor::new("john", "John", "Owner").with_collection("pets", ["fido"]),
        InstanceDescriptor::new("fido", "Fido", "Dog"),
    ])
    .unwrap();

    assert_eq!(graph.edge_count(), 1);
    assert!(graph.has_edge("john", "fido", EdgeKind::Associates));
    assert_eq!(graph.out_degree("fido"), 0);
}

#[test]
fn test_demo_registry_graph() {
    let registry = ClassRegistry::from_json(&demo("pets.json")).unwrap();
    let graph = extract_class_graph(&registry.classes).unwrap();

    assert_eq!(graph.node_count(), 6);
    assert!(graph.has_edge("Owner", "Animal", EdgeKind::Associates));
    assert!(graph.has_edge("Veterinarian", "Animal", EdgeKind::Associates));
    assert!(graph.has_edge("PetShop", "Animal", EdgeKind::Associates));
    assert!(graph.has_edge("PetShop", "Veterinarian", EdgeKind::Associates));

    let plan = compute_layout(&graph, Direction::Down, LinkStyle::Orthogonal).unwrap();
    assert_eq!(plan.roots, vec!["Animal", "Owner", "Veterinarian", "PetShop"]);
    assert_eq!(plan.max_depth(), 1);
}

#[test]
fn test_demo_registry_compose_all() {
    let registry = ClassRegistry::from_json(&demo("pets.json")).unwrap();
    let graph = relgraph::plugins::class::extract_class_graph_with(
        &registry.classes,
        ExtractionConfig::new(AssociationPolicy::ComposeAll),
    )
    .unwrap();
    assert_eq!(graph.edges_of_kind(EdgeKind::Associates).count(), 0);
    assert!(graph.has_edge("PetShop", "Veterinarian", EdgeKind::Composes));
}

#[test]
fn test_demo_instances_graph() {
    let set = InstanceSet::from_json(&demo("pet_instances.json")).unwrap();
    let graph = extract_instance_graph(&set.instances).unwrap();

    assert_eq!(graph.node_count(), 7);
    assert!(graph.has_edge("pet_palace", "dr_smith", EdgeKind::Composes));
    assert!(graph.has_edge("sarah", "mittens", EdgeKind::Associates));
    assert_eq!(graph.edge_count(), 6);

    let plan = compute_layout(&graph, Direction::Down, LinkStyle::Orthogonal).unwrap();
    assert_eq!(plan.roots, vec!["john", "sarah", "pet_palace"]);
    assert_eq!(plan.depth_of("dr_smith"), Some(1));
    assert_eq!(plan.depth_of("fido"), Some(1));
}

#[test]
fn test_generate_class_diagram_file() {
    let dir = TempDir::new().unwrap();
    let registry = ClassRegistry::from_json(&demo("pets.json")).unwrap();

    let path = generate_class_diagram(
        &registry,
        Some(dir.path()),
        None,
        Direction::Right,
        LinkStyle::Curved,
    )
    .unwrap();

    assert!(path.is_absolute());
    assert_eq!(path.file_name().unwrap(), "model_classes_diagram.drawio");
    let xml = fs::read_to_string(&path).unwrap();
    assert!(xml.contains("<mxGraphModel"));
    assert!(xml.contains("curved=1"));
    assert_eq!(xml.matches(r#"vertex="1""#).count(), 6);
}

#[test]
fn test_generate_class_diagram_custom_name() {
    let dir = TempDir::new().unwrap();
    let registry = ClassRegistry::new("tiny").with_class(ClassSource::new("Only"));

    let path = generate_class_diagram(
        &registry,
        Some(dir.path()),
        Some("custom"),
        Direction::Down,
        LinkStyle::Orthogonal,
    )
    .unwrap();
    assert_eq!(path.file_name().unwrap(), "custom.drawio");
}

#[test]
fn test_generate_instance_diagram_file() {
    let dir = TempDir::new().unwrap();
    let set = InstanceSet::from_json(&demo("pet_instances.json")).unwrap();

    let path = generate_instance_diagram(&set, Some(dir.path()), None).unwrap();
    assert_eq!(path.file_name().unwrap(), "pet_instances_diagram.drawio");

    let xml = fs::read_to_string(&path).unwrap();
    assert!(xml.contains(r#"value="Dr. Smith (Veterinarian)""#));
    assert!(xml.contains(r#"value="patients""#));
    assert!(xml.contains("edgeStyle=orthogonalEdgeStyle;"));
}

#[test]
fn test_stages_through_traits() {
    let mut graph = RelationshipGraph::new(GraphKind::Class);
    let extractor = ClassExtractor::new();
    extractor
        .extract(
            &[
                ClassSource::new("Shop").with_field(FieldSource::new("owner")),
                ClassSource::new("Owner"),
            ],
            &mut graph,
        )
        .unwrap();
    assert_eq!(extractor.name(), "class");

    let layout = TreeLayout::new();
    let plan = layout.layout(&graph).unwrap();
    assert_eq!(layout.direction(), "down");

    let renderer = DrawioRenderer::new();
    let xml = renderer.render(&graph, &plan).unwrap();
    assert!(xml.contains(r#"value="owner""#));
}
