pub mod header;
pub mod report_section;
pub mod result_panel;
pub mod scanner_card;
