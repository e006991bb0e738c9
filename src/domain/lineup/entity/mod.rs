pub mod current_point_defender;
pub mod selected_defender;
