use crate::graph::{AirportGraph, ParkingStand};

/// Assembles the groundnet document. Element and attribute names are
/// consumed verbatim by the simulator, and values are interpolated straight
/// into the text: the only dynamic content is numeric or an airport code, so
/// nothing ever needs escaping.
pub fn render(graph: &AirportGraph) -> String {
    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\"?>\n<groundnet>\n<version>1</version>\n<frequencies>\n");
    for freq in &graph.frequencies {
        xml += &format!(
            "\t<{tag}>{value}</{tag}>\n",
            tag = freq.category.tag(),
            value = freq.value
        );
    }
    xml.push_str("</frequencies>\n");

    xml.push_str("<parkingList>");
    for stand in &graph.parking {
        xml += &parking_entry(stand);
    }
    xml.push_str("\n</parkingList>\n");

    xml.push_str("<TaxiNodes>\n");
    for node in graph.taxi_nodes() {
        let (lat, lon) = node.position.to_groundnet();
        xml += &format!(
            "\t<node index=\"{}\" lat=\"{}\" lon=\"{}\" isOnRunway=\"{}\" holdPointType=\"{}\" />\n",
            node.index,
            lat,
            lon,
            if node.on_runway { "1" } else { "0" },
            node.hold.as_attr()
        );
    }
    xml.push_str("</TaxiNodes>\n<TaxiWaySegments>\n");
    for arc in &graph.arcs {
        xml += &format!(
            "\t<arc begin=\"{}\" end=\"{}\" isPushBackRoute=\"0\" name=\"\" />\n",
            arc.begin, arc.end
        );
    }
    xml.push_str("</TaxiWaySegments>\n</groundnet>\n");
    xml
}

fn parking_entry(stand: &ParkingStand) -> String {
    let (lat, lon) = stand.position.to_groundnet();
    format!(
        "\n\t\t<Parking index=\"{index}\"\n\
         \t\t\t type=\"gate\"\n\
         \t\t\t name=\"Gate\"\n\
         \t\t\t number=\"{number}\"\n\
         \t\t\t lat=\"{lat}\"\n\
         \t\t\t lon=\"{lon}\"\n\
         \t\t\t heading=\"{heading}\"\n\
         \t\t\t radius=\"{radius}\"\n\
         \t\t\t airlineCodes=\"\" />",
        index = stand.index,
        number = stand.index + 1,
        lat = lat,
        lon = lon,
        heading = stand.heading_deg,
        radius = crate::graph::PARK_RADIUS_M as u32
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apt::records::{FrequencyCategory, FrequencyRecord};
    use crate::graph::{GraphNode, HoldPointType, TaxiArc};
    use crate::geo::LatLon;

    fn freq(category: FrequencyCategory, value: &str) -> FrequencyRecord {
        FrequencyRecord {
            category,
            value: value.to_owned(),
        }
    }

    fn sample_graph() -> AirportGraph {
        AirportGraph {
            icao: "LDRI".to_owned(),
            frequencies: vec![
                freq(FrequencyCategory::Ground, "12190"),
                freq(FrequencyCategory::Approach, "11930"),
                freq(FrequencyCategory::Approach, "11935"),
            ],
            nodes: vec![
                GraphNode {
                    index: 9,
                    position: LatLon::new(45.5, 13.25),
                    on_runway: false,
                    hold: HoldPointType::None,
                },
                GraphNode {
                    index: 10,
                    position: LatLon::new(45.5, 13.26),
                    on_runway: false,
                    hold: HoldPointType::Normal,
                },
                GraphNode {
                    index: 11,
                    position: LatLon::new(-45.5, -13.25),
                    on_runway: true,
                    hold: HoldPointType::None,
                },
            ],
            stubs: vec![GraphNode {
                index: 21,
                position: LatLon::new(45.51, 13.27),
                on_runway: false,
                hold: HoldPointType::None,
            }],
            parking: vec![ParkingStand {
                index: 0,
                position: LatLon::new(45.52, 13.28),
                heading_deg: 270.0,
            }],
            arcs: vec![
                TaxiArc { begin: 0, end: 21 },
                TaxiArc { begin: 21, end: 0 },
            ],
        }
    }

    #[test]
    fn document_structure() {
        let doc = render(&sample_graph());
        assert!(doc.starts_with(
            "<?xml version=\"1.0\"?>\n<groundnet>\n<version>1</version>\n<frequencies>\n"
        ));
        assert!(doc.ends_with("</TaxiWaySegments>\n</groundnet>\n"));
        let order = [
            "<frequencies>",
            "</frequencies>",
            "<parkingList>",
            "</parkingList>",
            "<TaxiNodes>",
            "</TaxiNodes>",
            "<TaxiWaySegments>",
            "</TaxiWaySegments>",
        ];
        let mut at = 0;
        for tag in &order {
            let pos = doc[at..].find(tag).expect(tag);
            at += pos;
        }
    }

    #[test]
    fn approach_frequencies_share_one_tag() {
        let doc = render(&sample_graph());
        assert!(doc.contains("\t<GROUND>12190</GROUND>\n"));
        assert!(doc.contains("\t<APPROACH>11930</APPROACH>\n"));
        assert!(doc.contains("\t<APPROACH>11935</APPROACH>\n"));
    }

    #[test]
    fn parking_number_is_index_plus_one() {
        let doc = render(&sample_graph());
        assert!(doc.contains("<Parking index=\"0\""));
        assert!(doc.contains("\t\t\t number=\"1\"\n"));
        assert!(doc.contains("\t\t\t type=\"gate\"\n"));
        assert!(doc.contains("\t\t\t name=\"Gate\"\n"));
        assert!(doc.contains("\t\t\t radius=\"28\"\n"));
        assert!(doc.contains("\t\t\t airlineCodes=\"\" />"));
        assert!(doc.contains("\t\t\t heading=\"270\"\n"));
    }

    #[test]
    fn node_attributes() {
        let doc = render(&sample_graph());
        assert!(doc.contains(
            "\t<node index=\"9\" lat=\"N45 30\" lon=\"E13 15\" isOnRunway=\"0\" holdPointType=\"none\" />\n"
        ));
        assert!(doc.contains("index=\"10\"") && doc.contains("holdPointType=\"normal\""));
        assert!(doc.contains(
            "\t<node index=\"11\" lat=\"S45 30\" lon=\"W13 15\" isOnRunway=\"1\" holdPointType=\"none\" />\n"
        ));
    }

    #[test]
    fn arc_attributes() {
        let doc = render(&sample_graph());
        assert!(doc.contains("\t<arc begin=\"0\" end=\"21\" isPushBackRoute=\"0\" name=\"\" />\n"));
        assert!(doc.contains("\t<arc begin=\"21\" end=\"0\" isPushBackRoute=\"0\" name=\"\" />\n"));
    }
}
