pub mod mock_app;
