use crate::geometry::{add, cardinal, direction, distance, rotate_vec, scale, sub};
use crate::piece::{NubState, PuzzlePiece};

pub const NUB_HEIGHT_RATIO: f32 = 0.2;
pub const NUB_WIDTH_RATIO: f32 = 0.175;
pub const NUB_LEAD_RATIO: f32 = (1.0 - NUB_WIDTH_RATIO) / 2.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathSegment {
    MoveTo((f32, f32)),
    LineTo((f32, f32)),
    CurveTo {
        control1: (f32, f32),
        control2: (f32, f32),
        to: (f32, f32),
    },
    Close,
}

/// Closed vector silhouette of one piece, in a local frame whose anchor
/// bounding box starts at the origin when built at `path_origin`.
#[derive(Clone, Debug)]
pub struct OutlinePath {
    segments: Vec<PathSegment>,
}

impl OutlinePath {
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// On-curve anchor points, in traversal order.
    pub fn anchors(&self) -> impl Iterator<Item = (f32, f32)> + '_ {
        self.segments.iter().filter_map(|segment| match segment {
            PathSegment::MoveTo(p) | PathSegment::LineTo(p) => Some(*p),
            PathSegment::CurveTo { to, .. } => Some(*to),
            PathSegment::Close => None,
        })
    }
}

/// Pixel footprint of a piece rendered at base width `width`. Each `TabOut`
/// edge protrudes past the base square and grows the matching dimension by
/// one nub length; sockets recess inward and cost nothing.
pub fn piece_size(piece: &PuzzlePiece, width: f32) -> (f32, f32) {
    let nub_len = width * NUB_HEIGHT_RATIO;
    let mut size = (width, width);
    if piece.top.is_tab() {
        size.1 += nub_len;
    }
    if piece.bottom.is_tab() {
        size.1 += nub_len;
    }
    if piece.left.is_tab() {
        size.0 += nub_len;
    }
    if piece.right.is_tab() {
        size.0 += nub_len;
    }
    size
}

/// Where the base square's top-left corner sits inside the piece's buffer:
/// shifted right/down by one nub length when the left/top edge bulges out.
pub fn path_origin(piece: &PuzzlePiece, width: f32) -> (f32, f32) {
    let nub_len = width * NUB_HEIGHT_RATIO;
    (
        if piece.left.is_tab() { nub_len } else { 0.0 },
        if piece.top.is_tab() { nub_len } else { 0.0 },
    )
}

/// Walks the four edges top, right, bottom, left from `origin`, rotating the
/// edge vector a quarter turn between edges, and closes the path.
pub fn build_path(piece: &PuzzlePiece, origin: (f32, f32), width: f32) -> OutlinePath {
    let mut segments = Vec::with_capacity(22);
    segments.push(PathSegment::MoveTo(origin));

    let mut current = origin;
    let mut vector = (width, 0.0);
    for state in piece.edges() {
        let next = add(current, vector);
        match state {
            NubState::Straight => segments.push(PathSegment::LineTo(next)),
            // The raster frame is y-down, so a clockwise quarter turn of the
            // edge direction points out of the piece on every edge.
            NubState::TabOut => push_nub_edge(&mut segments, current, next, true),
            NubState::SocketIn => push_nub_edge(&mut segments, current, next, false),
        }
        vector = rotate_vec(vector, false, 90.0);
        current = next;
    }

    segments.push(PathSegment::Close);
    OutlinePath { segments }
}

fn push_nub_edge(
    segments: &mut Vec<PathSegment>,
    start: (f32, f32),
    end: (f32, f32),
    clockwise: bool,
) {
    let translation = direction(start, end);
    let edge_dir = cardinal(translation);
    let edge_len = distance(start, end);

    let nub_axis = rotate_vec(edge_dir, clockwise, 90.0);
    let nub_height = edge_len * NUB_HEIGHT_RATIO;
    let nub_width = edge_len * NUB_WIDTH_RATIO;

    let base_left = add(start, scale(translation, NUB_LEAD_RATIO));
    segments.push(PathSegment::LineTo(base_left));

    let top_left = add(base_left, scale(nub_axis, nub_height));
    segments.push(PathSegment::CurveTo {
        control1: add(
            base_left,
            rotate_vec(scale(nub_axis, nub_height * 0.4), clockwise, 15.0),
        ),
        control2: sub(top_left, scale(translation, 0.15)),
        to: top_left,
    });

    let top_right = add(top_left, scale(edge_dir, nub_width));
    segments.push(PathSegment::LineTo(top_right));

    let base_right = sub(top_right, scale(nub_axis, nub_height));
    segments.push(PathSegment::CurveTo {
        control1: add(top_right, scale(translation, 0.15)),
        control2: add(
            base_right,
            rotate_vec(scale(nub_axis, nub_height * 0.4), clockwise, -15.0),
        ),
        to: base_right,
    });

    segments.push(PathSegment::LineTo(end));
}
