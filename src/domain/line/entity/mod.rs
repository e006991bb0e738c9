pub mod defensive_line;
pub mod defensive_line_defender;
