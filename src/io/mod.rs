pub mod excel_read;
pub mod excel_write;
pub mod pdf_merge;
pub mod pdf_render;
