/*
 * Released under the terms of the Apache 2.0 license with LLVM
 * exception. See `LICENSE` for details.
 */

#![no_main]
use permsched::fuzzing::fuzz_target;
use permsched::fuzzing::problem;

fuzz_target!(|test_case: problem::TestCase| {
    let _ = env_logger::try_init();
    log::trace!("test case: {:?}", test_case);
    problem::check(test_case);
});
