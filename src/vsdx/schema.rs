//! Fixed vocabulary of the VSDX open-packaging format

pub const NS_VISIO: &str = "http://schemas.microsoft.com/office/visio/2012/main";
pub const NS_RELATIONSHIPS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
pub const NS_PACKAGE_RELATIONSHIPS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
pub const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
pub const NS_EXTENDED_PROPERTIES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties";
pub const NS_CORE_PROPERTIES: &str =
    "http://schemas.openxmlformats.org/package/2006/metadata/core-properties";
pub const NS_DC: &str = "http://purl.org/dc/elements/1.1/";
pub const NS_DCTERMS: &str = "http://purl.org/dc/terms/";
pub const NS_XSI: &str = "http://www.w3.org/2001/XMLSchema-instance";

pub mod content_type {
    pub const RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
    pub const XML: &str = "application/xml";
    pub const EXTENDED_PROPERTIES: &str =
        "application/vnd.openxmlformats-officedocument.extended-properties+xml";
    pub const CORE_PROPERTIES: &str = "application/vnd.openxmlformats-package.core-properties+xml";
    pub const DOCUMENT: &str = "application/vnd.ms-visio.drawing.main+xml";
    pub const PAGES: &str = "application/vnd.ms-visio.pages+xml";
    pub const PAGE: &str = "application/vnd.ms-visio.page+xml";
    pub const MASTERS: &str = "application/vnd.ms-visio.masters+xml";
    /// Media type of the finished archive
    pub const DRAWING: &str = "application/vnd.ms-visio.drawing";
}

pub mod rel_type {
    pub const EXTENDED_PROPERTIES: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";
    pub const CORE_PROPERTIES: &str =
        "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
    pub const DOCUMENT: &str = "http://schemas.microsoft.com/visio/2010/relationships/document";
    pub const PAGES: &str = "http://schemas.microsoft.com/visio/2010/relationships/pages";
    pub const PAGE: &str = "http://schemas.microsoft.com/visio/2010/relationships/page";
    pub const MASTERS: &str = "http://schemas.microsoft.com/visio/2010/relationships/masters";
}

pub mod path {
    pub const CONTENT_TYPES: &str = "[Content_Types].xml";
    pub const APP: &str = "docProps/app.xml";
    pub const CORE: &str = "docProps/core.xml";
    pub const DOCUMENT: &str = "visio/document.xml";
    pub const PAGES: &str = "visio/pages/pages.xml";
    pub const PAGE1: &str = "visio/pages/page1.xml";
    pub const MASTERS: &str = "visio/masters/masters.xml";
}

/// Connection-point indices used in `Connect` elements
pub mod glue {
    pub const BEGIN_POINT: &str = "9";
    pub const END_POINT: &str = "12";
    pub const WHOLE_SHAPE: &str = "3";
}

/// `ObjType` cell value marking a 1-D connector shape
pub const OBJ_TYPE_CONNECTOR: &str = "2";
