/// Relaxation solver for two-point boundary value problems
/// Example
/// ```ignore
/// use RustedRelaxation::numerical::Relaxation::Relaxation_api::RelaxationBVP;
/// use RustedRelaxation::numerical::Examples_and_utils::RelaxationExample;
/// let mut bvp = RelaxationBVP::from_example(RelaxationExample::ParachuteEquation).unwrap();
/// let outcome = bvp.solve().unwrap();
/// println!("{}", outcome);
/// let y = bvp.get_result().unwrap();
/// bvp.save_to_file(None).unwrap();
/// ```
pub mod Relaxation;

pub mod Examples_and_utils;
