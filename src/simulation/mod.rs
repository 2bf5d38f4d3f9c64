pub mod clock;
pub mod modality;
