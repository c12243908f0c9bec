//! draw.io XML renderer
//!
//! Turns a relationship graph and its layout plan into an `mxfile`
//! document that the draw.io editor opens directly.

use anyhow::Result;
use std::borrow::Cow;
use std::fmt::Write;
use tracing::{debug, info, span, trace, Level};
use unicode_width::UnicodeWidthStr;

use crate::core::{
    Database, DiagramError, EdgeKind, GraphKind, LayoutPlan, LinkStyle, RelationshipGraph,
    Renderer, StyleTag,
};

const MIN_NODE_WIDTH: usize = 120;
const NODE_HEIGHT: usize = 60;
const CHAR_WIDTH: usize = 8;
const LABEL_PADDING: usize = 40;
const MARGIN: usize = 40;

/// Box placed on the page for one node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeGeometry {
    pub id: String,
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

/// draw.io renderer
pub struct DrawioRenderer {
    /// Gap between neighbours within a level
    node_spacing: usize,
    /// Gap between consecutive levels
    level_spacing: usize,
}

impl DrawioRenderer {
    pub fn new() -> Self {
        Self {
            node_spacing: 40,
            level_spacing: 80,
        }
    }

    fn node_width(label: &str) -> usize {
        (UnicodeWidthStr::width(label) * CHAR_WIDTH + LABEL_PADDING).max(MIN_NODE_WIDTH)
    }

    /// Compute page coordinates for every node, in graph insertion order
    ///
    /// Levels run along the direction axis and are centred across the
    /// widest level. `up` and `left` place the roots at the far end.
    pub fn geometry(
        &self,
        graph: &RelationshipGraph,
        plan: &LayoutPlan,
    ) -> Result<Vec<NodeGeometry>> {
        let vertical = plan.direction.is_vertical();
        let max_depth = plan.max_depth();

        let mut sizes = Vec::with_capacity(graph.node_count());
        for node in graph.node_list() {
            let placement = plan.placement(&node.id).ok_or_else(|| {
                DiagramError::render_error(format!("node '{}' has no placement", node.id))
            })?;
            sizes.push((placement, Self::node_width(&node.label), NODE_HEIGHT));
        }

        // (along, across) extent of a node relative to the direction axis
        let extent = |width: usize, height: usize| {
            if vertical {
                (height, width)
            } else {
                (width, height)
            }
        };

        let level_depth = sizes
            .iter()
            .map(|&(_, w, h)| extent(w, h).0)
            .max()
            .unwrap_or(NODE_HEIGHT);

        let mut level_span = vec![0usize; max_depth + 1];
        let mut level_members = vec![0usize; max_depth + 1];
        for &(placement, w, h) in &sizes {
            level_span[placement.depth] += extent(w, h).1;
            level_members[placement.depth] += 1;
        }
        for (span, members) in level_span.iter_mut().zip(&level_members) {
            *span += members.saturating_sub(1) * self.node_spacing;
        }
        let widest = level_span.iter().copied().max().unwrap_or(0);

        // Running offset across the axis within each level, by ordinal
        let mut order: Vec<usize> = (0..sizes.len()).collect();
        order.sort_by_key(|&i| (sizes[i].0.depth, sizes[i].0.ordinal));

        let mut cursor: Vec<usize> = level_span
            .iter()
            .map(|span| MARGIN + (widest - span) / 2)
            .collect();

        let mut geometry: Vec<Option<NodeGeometry>> = vec![None; sizes.len()];
        for i in order {
            let (placement, width, height) = sizes[i];
            let level = if plan.direction.is_reversed() {
                max_depth - placement.depth
            } else {
                placement.depth
            };
            let along = MARGIN + level * (level_depth + self.level_spacing);
            let across = cursor[placement.depth];
            cursor[placement.depth] += extent(width, height).1 + self.node_spacing;

            let (x, y) = if vertical {
                (across, along)
            } else {
                (along, across)
            };
            trace!(node = %placement.id, x, y, width, height, "Placed node");
            geometry[i] = Some(NodeGeometry {
                id: placement.id.clone(),
                x,
                y,
                width,
                height,
            });
        }

        Ok(geometry.into_iter().flatten().collect())
    }

    fn node_style(style: StyleTag) -> String {
        match style {
            StyleTag::Class => "rounded=1;whiteSpace=wrap;html=1;".to_string(),
            StyleTag::Instance(color) => format!(
                "rounded=1;whiteSpace=wrap;html=1;fillColor={};strokeColor={};",
                color.fill(),
                color.stroke()
            ),
        }
    }

    fn edge_style(kind: EdgeKind, link_style: LinkStyle) -> String {
        let routing = match link_style {
            LinkStyle::Orthogonal => "edgeStyle=orthogonalEdgeStyle;",
            LinkStyle::Straight => "edgeStyle=none;",
            LinkStyle::Curved => "edgeStyle=orthogonalEdgeStyle;curved=1;",
        };
        let arrows = match kind {
            EdgeKind::Inherits => "endArrow=block;endFill=0;",
            EdgeKind::Composes => "startArrow=diamondThin;startFill=1;endArrow=open;",
            EdgeKind::Associates => "endArrow=open;dashed=1;",
        };
        format!("{}{}html=1;", routing, arrows)
    }
}

impl Default for DrawioRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer<RelationshipGraph> for DrawioRenderer {
    type Output = String;

    fn render(&self, graph: &RelationshipGraph, plan: &LayoutPlan) -> Result<String> {
        let render_span = span!(
            Level::INFO,
            "render_drawio",
            node_count = graph.node_count(),
            edge_count = graph.edge_count()
        );
        let _enter = render_span.enter();

        info!("Starting draw.io rendering");

        let geometry = self.geometry(graph, plan)?;
        let page_name = match graph.kind() {
            GraphKind::Class => "Class Diagram",
            GraphKind::Instance => "Instance Diagram",
        };

        let mut out = String::new();
        writeln!(out, r#"<mxfile host="relgraph">"#)?;
        writeln!(out, r#"  <diagram id="relgraph" name="{}">"#, page_name)?;
        writeln!(
            out,
            r#"    <mxGraphModel grid="1" gridSize="10" guides="1" tooltips="1" connect="1" arrows="1" fold="1" page="1" pageScale="1" math="0" shadow="0">"#
        )?;
        writeln!(out, "      <root>")?;
        writeln!(out, r#"        <mxCell id="0"/>"#)?;
        writeln!(out, r#"        <mxCell id="1" parent="0"/>"#)?;

        for (index, (node, geo)) in graph.node_list().iter().zip(&geometry).enumerate() {
            writeln!(
                out,
                r#"        <mxCell id="node-{}" value="{}" style="{}" vertex="1" parent="1">"#,
                index,
                escape_xml(&node.label),
                Self::node_style(node.style)
            )?;
            writeln!(
                out,
                r#"          <mxGeometry x="{}" y="{}" width="{}" height="{}" as="geometry"/>"#,
                geo.x, geo.y, geo.width, geo.height
            )?;
            writeln!(out, "        </mxCell>")?;
        }

        for (index, edge) in graph.edge_list().iter().enumerate() {
            let (Some(source), Some(target)) =
                (graph.node_index(&edge.from), graph.node_index(&edge.to))
            else {
                return Err(DiagramError::render_error(format!(
                    "edge {} -> {} references a missing node",
                    edge.from, edge.to
                ))
                .into());
            };
            writeln!(
                out,
                r#"        <mxCell id="edge-{}" value="{}" style="{}" edge="1" parent="1" source="node-{}" target="node-{}">"#,
                index,
                escape_xml(edge.label.as_deref().unwrap_or("")),
                Self::edge_style(edge.kind, plan.link_style),
                source,
                target
            )?;
            writeln!(
                out,
                r#"          <mxGeometry relative="1" as="geometry"/>"#
            )?;
            writeln!(out, "        </mxCell>")?;
        }

        writeln!(out, "      </root>")?;
        writeln!(out, "    </mxGraphModel>")?;
        writeln!(out, "  </diagram>")?;
        writeln!(out, "</mxfile>")?;

        debug!(output_len = out.len(), "Rendering completed");
        Ok(out)
    }

    fn name(&self) -> &'static str {
        "drawio"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }

    fn format(&self) -> &'static str {
        "drawio"
    }
}

/// Escape text for use inside an XML attribute
pub fn escape_xml(raw: &str) -> Cow<'_, str> {
    if !raw.chars().any(needs_escape) {
        return Cow::Borrowed(raw);
    }
    let mut out = String::with_capacity(raw.len() + 8);
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            '\t' => out.push_str("&#9;"),
            // Not allowed anywhere in an XML 1.0 document
            c if is_forbidden_in_xml(c) => {}
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

fn needs_escape(c: char) -> bool {
    matches!(c, '&' | '<' | '>' | '"' | '\'') || c.is_ascii_control() || is_forbidden_in_xml(c)
}

fn is_forbidden_in_xml(c: char) -> bool {
    (c < '\u{20}' && !matches!(c, '\t' | '\n' | '\r')) || matches!(c, '\u{FFFE}' | '\u{FFFF}')
}
