pub mod upload_documents_route;
