// Chaining deferred computations with delegation.
//
// Three tasks form a pipeline: the outermost delegates to a parser, which
// delegates to a reader. A single resume drives the whole chain — the
// innermost frame finishes first and each continuation runs on the way back
// out, before control returns to the driver.

use tether::{Step, Task, delegate};

fn read_request() -> Task<String> {
    Task::new(|| {
        println!("reader: producing raw input");
        Ok(Step::Done(String::from("2 + 40")))
    })
}

fn parse_request() -> Task<(i64, i64)> {
    Task::new(|| {
        Ok(delegate(read_request(), |raw| {
            println!("parser: splitting {raw:?}");
            let mut parts = raw.split('+').map(|part| part.trim().parse::<i64>());
            match (parts.next(), parts.next()) {
                (Some(Ok(lhs)), Some(Ok(rhs))) => Ok(Step::Done((lhs, rhs))),
                _ => Err(tether::Error::failed(format!("malformed request: {raw}"))),
            }
        }))
    })
}

fn main() {
    env_logger::init();

    let mut task = parse_request().then(|(lhs, rhs)| {
        println!("adder: {lhs} + {rhs}");
        Ok(Step::Done(lhs + rhs))
    });

    println!("nothing has run yet: is_ready = {}", task.is_ready());

    let mut resumes = 0;
    while !task.is_ready() {
        task.resume();
        resumes += 1;
    }

    println!(
        "finished after {resumes} resume(s): {:?}",
        task.result().unwrap()
    );
}
