use netweave_core::{TypeRef, names};

use crate::descriptor::{MethodDescriptor, TypeDescriptor, TypeFlags};

/// Declarations of the standard library, engine and networking runtime that
/// woven code resolves against.
pub fn reference_types() -> Vec<TypeDescriptor> {
    let mut out = Vec::new();

    out.push(TypeDescriptor::new(names::OBJECT, names::CORLIB_MODULE));
    for name in [
        names::VOID,
        names::BOOLEAN,
        names::CHAR,
        names::BYTE,
        names::SBYTE,
        names::INT16,
        names::UINT16,
        names::INT32,
        names::UINT32,
        names::INT64,
        names::UINT64,
        names::SINGLE,
        names::DOUBLE,
        names::RUNTIME_TYPE_HANDLE,
    ] {
        out.push(value_type(name, names::CORLIB_MODULE));
    }
    out.push(class(names::STRING, names::CORLIB_MODULE, names::OBJECT));
    out.push(class(names::TYPE, names::CORLIB_MODULE, names::OBJECT));
    out.push(abstract_class(
        names::MULTICAST_DELEGATE,
        names::CORLIB_MODULE,
        names::OBJECT,
    ));
    out.push(interface(names::ENUMERATOR, names::CORLIB_MODULE));

    out.push(class(names::ENGINE_OBJECT, names::ENGINE_MODULE, names::OBJECT));
    out.push(class(
        names::COMPONENT,
        names::ENGINE_MODULE,
        names::ENGINE_OBJECT,
    ));
    out.push(class(names::BEHAVIOUR, names::ENGINE_MODULE, names::COMPONENT));
    out.push(class(
        names::MONO_BEHAVIOUR,
        names::ENGINE_MODULE,
        names::BEHAVIOUR,
    ));
    out.push(class(
        names::GAME_OBJECT,
        names::ENGINE_MODULE,
        names::ENGINE_OBJECT,
    ));
    out.push(abstract_class(
        names::SCRIPTABLE_OBJECT,
        names::ENGINE_MODULE,
        names::ENGINE_OBJECT,
    ));
    out.push(value_type(names::VECTOR3, names::ENGINE_MODULE));
    out.push(class(names::DEBUG, names::ENGINE_MODULE, names::OBJECT));

    let net = names::RUNTIME_MODULE;
    out.push(class(names::NETWORK_BEHAVIOUR, net, names::MONO_BEHAVIOUR));
    out.push(class(names::NETWORK_IDENTITY, net, names::MONO_BEHAVIOUR));
    out.push(value_type(names::NETWORK_INSTANCE_ID, net));
    out.push(class(names::NETWORK_CONNECTION, net, names::OBJECT));
    out.push(class(
        names::LOCAL_CONNECTION_TO_SERVER,
        net,
        names::NETWORK_CONNECTION,
    ));
    for name in [
        names::NETWORK_WRITER,
        names::NETWORK_READER,
        names::NETWORK_SERVER,
        names::NETWORK_CLIENT,
        names::CLIENT_SCENE,
        names::NETWORK_CRC,
    ] {
        out.push(class(name, net, names::OBJECT));
    }

    let mut sync_list = abstract_class(names::SYNC_LIST, net, names::OBJECT);
    sync_list.generic_params.push("T".into());
    out.push(sync_list);

    let mut sync_list_struct = TypeDescriptor::new(names::SYNC_LIST_STRUCT, net).with_base(
        TypeRef::generic(names::SYNC_LIST, vec![TypeRef::named("T")]),
    );
    sync_list_struct.generic_params.push("T".into());
    out.push(sync_list_struct);

    for (name, element) in [
        (names::SYNC_LIST_INT, names::INT32),
        (names::SYNC_LIST_UINT, names::UINT32),
        (names::SYNC_LIST_FLOAT, names::SINGLE),
        (names::SYNC_LIST_BOOL, names::BOOLEAN),
        (names::SYNC_LIST_STRING, names::STRING),
    ] {
        out.push(TypeDescriptor::new(name, net).with_base(TypeRef::generic(
            names::SYNC_LIST,
            vec![TypeRef::named(element)],
        )));
    }

    out.push(
        class(names::CMD_DELEGATE, net, names::MULTICAST_DELEGATE).with_method(
            MethodDescriptor::new(names::INVOKE)
                .with_param("obj", names::NETWORK_BEHAVIOUR)
                .with_param("reader", names::NETWORK_READER)
                .virtual_(),
        ),
    );
    out.push(
        class(names::EVENT_DELEGATE, net, names::MULTICAST_DELEGATE).with_method(
            MethodDescriptor::new(names::INVOKE).virtual_(),
        ),
    );

    for name in [
        names::SYNC_VAR_ATTR,
        names::COMMAND_ATTR,
        names::CLIENT_RPC_ATTR,
        names::TARGET_RPC_ATTR,
        names::SYNC_EVENT_ATTR,
        names::NETWORK_SETTINGS_ATTR,
    ] {
        out.push(class(name, net, names::OBJECT));
    }

    out
}

fn class(name: &str, module: &str, base: &str) -> TypeDescriptor {
    TypeDescriptor::new(name, module).with_base(base)
}

fn abstract_class(name: &str, module: &str, base: &str) -> TypeDescriptor {
    let mut ty = class(name, module, base);
    ty.flags.is_abstract = true;
    ty
}

fn value_type(name: &str, module: &str) -> TypeDescriptor {
    let mut ty = class(name, module, names::OBJECT);
    ty.flags.is_value_type = true;
    ty
}

fn interface(name: &str, module: &str) -> TypeDescriptor {
    let mut ty = TypeDescriptor::new(name, module);
    ty.flags = TypeFlags {
        is_interface: true,
        is_abstract: true,
        ..TypeFlags::default()
    };
    ty
}
