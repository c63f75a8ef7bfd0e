//! Canvas painter for a [`Frame`].
//!
//! Drawing order gives the z-ordering:
//! 1. Background (screen space)
//! 2. Links, then nodes, then labels (world space, under the view transform)
//! 3. Placeholder message (screen space), only in the empty state

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::scene::{Frame, LabelShape, LinkShape, NodeShape, Placeholder};

/// Paints the complete frame to the canvas.
pub fn paint(ctx: &CanvasRenderingContext2d, frame: &Frame) {
	ctx.set_fill_style_str(&frame.background.to_css());
	ctx.fill_rect(0.0, 0.0, frame.width, frame.height);

	if let Some(placeholder) = &frame.placeholder {
		draw_placeholder(ctx, frame, placeholder);
		return;
	}

	ctx.save();
	let _ = ctx.translate(frame.transform.x, frame.transform.y);
	let _ = ctx.scale(frame.transform.k, frame.transform.k);

	draw_links(ctx, &frame.links);
	draw_nodes(ctx, &frame.nodes);
	draw_labels(ctx, frame, &frame.labels);

	ctx.restore();
}

fn draw_links(ctx: &CanvasRenderingContext2d, links: &[LinkShape]) {
	for link in links {
		ctx.begin_path();
		ctx.move_to(link.x1, link.y1);
		ctx.line_to(link.x2, link.y2);
		ctx.set_stroke_style_str(&link.color.to_css());
		ctx.set_line_width(link.width);
		ctx.stroke();
	}
}

fn draw_nodes(ctx: &CanvasRenderingContext2d, nodes: &[NodeShape]) {
	for node in nodes {
		ctx.begin_path();
		let _ = ctx.arc(node.x, node.y, node.radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&node.fill.to_css());
		ctx.fill();

		if node.stroke_width > 0.0 {
			ctx.set_stroke_style_str(&node.stroke.to_css());
			ctx.set_line_width(node.stroke_width);
			ctx.stroke();
		}
	}
}

fn draw_labels(ctx: &CanvasRenderingContext2d, frame: &Frame, labels: &[LabelShape]) {
	ctx.set_font(&frame.label_font);
	ctx.set_text_align("center");
	ctx.set_text_baseline("alphabetic");
	ctx.set_fill_style_str(&frame.label_color.to_css());
	for label in labels {
		let _ = ctx.fill_text(&label.text, label.x, label.y);
	}
}

fn draw_placeholder(ctx: &CanvasRenderingContext2d, frame: &Frame, placeholder: &Placeholder) {
	ctx.set_font(&placeholder.font);
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	ctx.set_fill_style_str(&placeholder.color.to_css());
	let _ = ctx.fill_text(&placeholder.text, frame.width / 2.0, frame.height / 2.0);
}
