#![allow(non_snake_case)]
use RustedRelaxation::numerical::Examples_and_utils::RelaxationExample;
use RustedRelaxation::numerical::Relaxation::Relaxation_api::RelaxationBVP;
use RustedRelaxation::numerical::Relaxation::relaxation_error::RelaxationError;
use strum::IntoEnumIterator;

fn main() -> Result<(), RelaxationError> {
    let example = 1;
    match example {
        0 => {
            // every stored problem, compared with its exact solution
            for problem in RelaxationExample::iter() {
                let mut bvp = RelaxationBVP::from_example(problem)?;
                let outcome = bvp.solve()?;
                let deviation = bvp.max_deviation(&problem.exact_solution()?);
                println!("{:?}: {}, max deviation {:?}", problem, outcome, deviation);
            }
        }
        1 => {
            // two-point problem y'' = -2(1 + ln y^2) y, settings read from a document
            let settings = "
            solver_settings
            max_iterations: 50
            tolerance: 1e-10
            slowc: 1.0
            scalv: 1.0, 1.0
            indexv: 0, 1
            nb: 1
            logging
            loglevel: info
            log_to_file: false
            ";
            let problem = RelaxationExample::TwoPointGaussian;
            let mut bvp = RelaxationBVP::from_example(problem)?.with_settings_document(settings)?;
            let outcome = bvp.solve()?;
            println!("{}", outcome);
            for record in bvp.history() {
                println!(
                    "iteration {:>3} error {:>12.5e} fac {:>8.4}",
                    record.iteration, record.error, record.fac
                );
            }
            println!(
                "max deviation from exp(-x^2): {:?}",
                bvp.max_deviation(&problem.exact_solution()?)
            );
            bvp.save_to_csv(None)?;
        }
        2 => {
            // parachute equation, both conditions at the first point
            let mut bvp = RelaxationBVP::from_example(RelaxationExample::ParachuteEquation)?;
            bvp.set_logging(Some("debug".to_string()), true);
            let outcome = bvp.solve()?;
            println!("{}", outcome);
            if let Some(y) = bvp.get_result() {
                println!("y(1) = {}, y'(1) = {}", y[(0, y.ncols() - 1)], y[(1, y.ncols() - 1)]);
            }
            bvp.save_to_file(None)?;
        }
        _ => println!("no example with number {}", example),
    }
    Ok(())
}
