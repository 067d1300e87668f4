use netweave_core::short_name;
use netweave_weaver::hash::routing_id;

pub struct HashArgs {
    pub type_name: String,
    pub kind: String,
    pub member: String,
}

pub fn run(args: HashArgs) {
    let type_name = short_name(&args.type_name);
    println!("{}", routing_id(type_name, &args.kind, &args.member));
}
