pub mod incrementer;
pub mod modality;
