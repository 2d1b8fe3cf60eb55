pub mod badges;
pub mod charts;
pub mod layout;
pub mod modal;
pub mod quick_ocr_upload;
