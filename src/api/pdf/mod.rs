// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Document Processing API Module
//!
//! Upload documents as base64, then inspect, list and delete the vector
//! stores built from them.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::{
    delete_vector_store_handler, get_vector_store_handler, list_vector_stores_handler,
    pdf_health_handler, process_document_handler,
};
pub use request::ProcessDocumentRequest;
pub use response::{
    DeleteVectorStoreResponse, ProcessDocumentResponse, StoreHealthResponse, VectorStoreResponse,
};
