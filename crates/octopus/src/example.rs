//! A small demo network: 17 stations, 22 edges and 7 lines.

use octopus_graph::{Color, NodeId, SignatureKind};

use crate::error::Result;
use crate::map::MetroMap;
use crate::options::MakeSpaceOptions;

const LINE_WIDTH: f64 = 20.0;

const STATIONS: [(&str, f64, f64); 17] = [
    ("A", 150.0, 200.0),
    ("B", 150.0, 100.0),
    ("C", 200.0, 100.0),
    ("D", 200.0, 150.0),
    ("E", 200.0, 250.0),
    ("F", 150.0, 300.0),
    ("G", 100.0, 300.0),
    ("H", 100.0, 200.0),
    ("I", 100.0, 150.0),
    ("J", 150.0, 250.0),
    ("K", 170.0, 250.0),
    ("L", 300.0, 200.0),
    ("N", 100.0, 250.0),
    ("O", 170.0, 150.0),
    ("P", 300.0, 250.0),
    ("Q", 400.0, 100.0),
    ("R", 100.0, 350.0),
];

const LINE_COLORS: [Color; 7] = [
    Color::BLUE,
    Color::RED,
    Color::GREEN,
    Color::YELLOW,
    Color::ORANGE,
    Color::MAGENTA,
    Color::BLACK,
];

/// Station pairs and the (1-based) lines running between them.
const CONNECTIONS: [(usize, usize, &[usize]); 22] = [
    (0, 1, &[1, 2, 3, 4, 5]),
    (2, 1, &[1, 2, 4, 5]),
    (2, 3, &[1, 2, 4, 5]),
    (3, 4, &[1, 2, 4, 5]),
    (4, 5, &[1, 2, 4, 5, 6]),
    (5, 6, &[1, 6]),
    (6, 12, &[1, 2, 4]),
    (12, 7, &[1, 2]),
    (7, 0, &[1, 2, 3, 6, 7]),
    (7, 8, &[1, 3, 6]),
    (8, 1, &[1, 2, 3, 4, 5, 6, 7]),
    (8, 0, &[1, 4, 5]),
    (0, 9, &[5]),
    (9, 10, &[5, 2]),
    (11, 2, &[1, 3]),
    (4, 10, &[2]),
    (13, 10, &[2, 5, 4]),
    (13, 3, &[1, 2, 4, 5, 6]),
    (14, 4, &[1, 2, 4, 5]),
    (14, 3, &[1]),
    (6, 16, &[1]),
    (5, 16, &[1]),
];

pub fn example_metro_map(options: MakeSpaceOptions) -> Result<MetroMap> {
    let mut map = MetroMap::new(options)?;
    let stations: Vec<NodeId> = STATIONS
        .iter()
        .map(|&(name, x, y)| map.create_node(x, y, name, SignatureKind::RectangleStation))
        .collect();
    let lines: Vec<_> = LINE_COLORS
        .iter()
        .map(|&color| map.create_route(LINE_WIDTH, color))
        .collect();
    for &(a, b, on) in &CONNECTIONS {
        let routes: Vec<_> = on.iter().map(|&line| lines[line - 1]).collect();
        map.create_edge(stations[a], stations[b], &routes)?;
    }
    Ok(map)
}
