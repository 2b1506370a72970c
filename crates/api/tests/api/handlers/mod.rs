mod appointment_test;
mod mock_store_test;
mod patient_test;
