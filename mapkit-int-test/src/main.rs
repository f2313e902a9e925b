use mapkit::errors::MappingResult;
use mapkit_int_test::model::User;
use mapkit_int_test::test_util::create_test_context;
use std::thread;
use std::time::Instant;

const PATHS: &[&str] = &[
    "userName",
    "addressCity",
    "address_zipCode",
    "addressLocationLatitude",
    "ordersTotal",
    "ordersLineItemsProductName",
    "ordersCustomerFriendsUserName",
    "friends.address.street",
];

fn main() -> MappingResult<()> {
    colog::init();
    println!("Starting resolution stress test...");
    let ctx = create_test_context()?;
    let context = ctx.context();

    let iterations = 100_000;
    let threads = 4;

    let start = Instant::now();
    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let context = context.clone();
            thread::spawn(move || -> MappingResult<()> {
                for i in 0..iterations {
                    context.resolve::<User>(PATHS[i % PATHS.len()])?;
                }
                Ok(())
            })
        })
        .collect();

    for handle in handles {
        match handle.join() {
            Ok(result) => result?,
            Err(_) => log::error!("Resolver thread panicked"),
        }
    }

    let elapsed = start.elapsed();
    println!(
        "Resolved {} paths on {} threads in {:?} ({} cached)",
        iterations * threads,
        threads,
        elapsed,
        context.resolver().cache().len()
    );

    let uncached = mapkit::MappingContext::builder()
        .cache_enabled(false)
        .register::<User>()
        .build()?;

    let start = Instant::now();
    for i in 0..iterations {
        uncached.resolve::<User>(PATHS[i % PATHS.len()])?;
    }
    println!(
        "Resolved {} paths without cache in {:?}",
        iterations,
        start.elapsed()
    );
    Ok(())
}
